use crate::catalog::ProductType;

pub const RESEARCH_SYSTEM_PROMPT: &str = "You are an elite market research analyst focused on the Indonesian digital products market. \
Analyze the given topic for business potential, demand signals, competition, and monetization opportunities. \
Produce a comprehensive report with data points, market size estimates, and actionable insights.";

pub const SCORE_SYSTEM_PROMPT: &str = "You are a venture capitalist evaluating Indonesian digital product ideas. \
Based on the research report, score the business potential from 0 to 100. \
Consider: market demand (40%), competition level (20%), monetization potential (20%), and ease of automation (20%). \
Return ONLY the number.";

/// 每种产品的内容要点，字段结构由必填字段列表约束
fn brief(product_type: ProductType) -> &'static str {
    match product_type {
        ProductType::ContentCalendar => {
            "a 30-day social media content calendar for Indonesian UMKM. calendar_weeks is an array of 4 weeks, \
             each with week_number, theme, hashtags (10) and days (7 objects with date, content_type, idea, best_time)."
        }
        ProductType::CaptionBank => {
            "a bank of 30 engaging social media captions in conversational Indonesian. captions is an array of 30 objects \
             with day (1-30), text (100-200 chars) and hashtags (array of 5). Mix educational, promotional, engagement and storytelling posts."
        }
        ProductType::InvoiceMacro => {
            "professional invoice templates with PPN 11% tax. invoices is an array of 3 invoices with company and client details, \
             number (INV/2025/001 format), date, due_date, bank details, items (description, quantity, price, total), subtotal, tax, total and notes."
        }
        ProductType::KeywordTracker => {
            "a Shopee keyword ranking report. keywords is an array of objects with keyword, search_volume, competition, \
             current_position, previous_position, change, cpc_estimate and recommended_action; recommendations is an array of 5 strategies."
        }
        ProductType::HashtagClusterer => {
            "hashtag clusters for Indonesian social media. clusters is an array of 5 clusters with cluster_name and hashtags \
             (tag, posts_count, engagement_rate, best_time); monthly_calendar maps days to cluster recommendations."
        }
        ProductType::CopySwipes => {
            "a copywriting swipe file. swipe_sections is an array of sections with name and swipes (title, type, content, \
             conversion_rate, click_rate, best_for); usage_tips is an array of 5 tips with title and content."
        }
        ProductType::BatikPatterns => {
            "a digital batik pattern collection for Canva. patterns is an array with name, region, preview_url, format, \
             resolution, seamless and colors (hex codes); usage_examples is an array with icon, title and description."
        }
        ProductType::BrandKit => {
            "a complete brand kit. logos (name, preview, background, usage), colors (name, hex, rgb, cmyk), \
             fonts (name, family, category, sample_text, sample_size, weights), templates and guidelines."
        }
        ProductType::CapcutTemplates => {
            "a CapCut video template pack. templates is an array with name, category, duration, description and scenes; \
             tutorial_steps is an ordered array of steps."
        }
        ProductType::PajakCalculator => {
            "an Indonesian UMKM tax calculator guide (PPh Final 0.5%). sample_data holds monthly revenue figures, \
             tax_rules, tax_tips and tax_deadlines are arrays."
        }
        ProductType::CashFlow => {
            "a cash flow tracker. summary holds totals, transactions is an array with date, description, category, type and amount; \
             projections covers the next months."
        }
        ProductType::SopTemplates => {
            "standard operating procedure templates. sop_documents is an array with title, category, purpose, scope and steps."
        }
        ProductType::RamadanCalendar => {
            "a Ramadan content calendar for Muslim stores. prayer_times per day, calendar_days with a content idea per day, \
             content_categories, popular_hashtags and special_days."
        }
        ProductType::WeddingPlanner => {
            "a wedding planner. budget_items with category, item, estimated and actual cost; timeline of tasks, vendors, \
             guest_stats, guest_list, todo_columns and important_notes."
        }
        ProductType::YearendPlanner => {
            "a year-end reflection and planning workbook. achievements, goal_categories, monthly_breakdown, habits, \
             visions and reflection_prompts."
        }
    }
}

/// 构造内容生成的系统提示词
pub fn content_system_prompt(product_type: ProductType) -> String {
    let fields = product_type.required_fields().join(", ");
    format!(
        "You create digital products for Indonesian small businesses. Write all user-facing text in Indonesian.\n\
         Create {}\n\n\
         Return ONLY a JSON object. It MUST contain these top-level fields: {}.\n\
         `name` is a catchy product name and `description` a compelling product description.",
        brief(product_type),
        fields
    )
}
