//! 产品类型目录：产品类型 -> (模板资源, 必填字段) 的封闭映射

use serde::{Deserialize, Serialize};

use crate::error::AutopreneurError;
use crate::types::Payload;

/// 产品套件
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Suite {
    UmkmProductivity,
    ShopeeToolkit,
    CanvaAssets,
    FinancePack,
    Seasonal,
}

impl Suite {
    pub const ALL: [Suite; 5] = [
        Suite::UmkmProductivity,
        Suite::ShopeeToolkit,
        Suite::CanvaAssets,
        Suite::FinancePack,
        Suite::Seasonal,
    ];

    /// 模板资源的目录名
    pub fn as_str(&self) -> &'static str {
        match self {
            Suite::UmkmProductivity => "umkm_productivity",
            Suite::ShopeeToolkit => "shopee_toolkit",
            Suite::CanvaAssets => "canva_assets",
            Suite::FinancePack => "finance_pack",
            Suite::Seasonal => "seasonal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Suite::UmkmProductivity => "UMKM Productivity Suite",
            Suite::ShopeeToolkit => "Shopee Seller Toolkit",
            Suite::CanvaAssets => "Canva Asset Packs",
            Suite::FinancePack => "Finance & Tax Pack",
            Suite::Seasonal => "Seasonal Planners",
        }
    }

    /// 套件打包价（IDR）
    pub fn bundle_price(&self) -> u32 {
        match self {
            Suite::UmkmProductivity => 199_000,
            Suite::ShopeeToolkit => 149_000,
            Suite::CanvaAssets => 149_000,
            Suite::FinancePack => 249_000,
            Suite::Seasonal => 99_000,
        }
    }

    pub fn products(&self) -> [ProductType; 3] {
        use ProductType::*;
        match self {
            Suite::UmkmProductivity => [ContentCalendar, CaptionBank, InvoiceMacro],
            Suite::ShopeeToolkit => [KeywordTracker, HashtagClusterer, CopySwipes],
            Suite::CanvaAssets => [BatikPatterns, BrandKit, CapcutTemplates],
            Suite::FinancePack => [PajakCalculator, CashFlow, SopTemplates],
            Suite::Seasonal => [RamadanCalendar, WeddingPlanner, YearendPlanner],
        }
    }
}

impl std::fmt::Display for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 产品类型
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    ContentCalendar,
    CaptionBank,
    InvoiceMacro,
    KeywordTracker,
    HashtagClusterer,
    CopySwipes,
    BatikPatterns,
    BrandKit,
    CapcutTemplates,
    PajakCalculator,
    CashFlow,
    SopTemplates,
    RamadanCalendar,
    WeddingPlanner,
    YearendPlanner,
}

/// 模板分派结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub template: &'static str,
    pub required_fields: &'static [&'static str],
}

/// 可导出为CSV的表格字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvTable {
    /// payload中数组字段名
    pub field: &'static str,
    /// 数组元素中要导出的列
    pub columns: &'static [&'static str],
}

impl ProductType {
    pub const ALL: [ProductType; 15] = [
        ProductType::ContentCalendar,
        ProductType::CaptionBank,
        ProductType::InvoiceMacro,
        ProductType::KeywordTracker,
        ProductType::HashtagClusterer,
        ProductType::CopySwipes,
        ProductType::BatikPatterns,
        ProductType::BrandKit,
        ProductType::CapcutTemplates,
        ProductType::PajakCalculator,
        ProductType::CashFlow,
        ProductType::SopTemplates,
        ProductType::RamadanCalendar,
        ProductType::WeddingPlanner,
        ProductType::YearendPlanner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::ContentCalendar => "content_calendar",
            ProductType::CaptionBank => "caption_bank",
            ProductType::InvoiceMacro => "invoice_macro",
            ProductType::KeywordTracker => "keyword_tracker",
            ProductType::HashtagClusterer => "hashtag_clusterer",
            ProductType::CopySwipes => "copy_swipes",
            ProductType::BatikPatterns => "batik_patterns",
            ProductType::BrandKit => "brand_kit",
            ProductType::CapcutTemplates => "capcut_templates",
            ProductType::PajakCalculator => "pajak_calculator",
            ProductType::CashFlow => "cash_flow",
            ProductType::SopTemplates => "sop_templates",
            ProductType::RamadanCalendar => "ramadan_calendar",
            ProductType::WeddingPlanner => "wedding_planner",
            ProductType::YearendPlanner => "yearend_planner",
        }
    }

    pub fn suite(&self) -> Suite {
        use ProductType::*;
        match self {
            ContentCalendar | CaptionBank | InvoiceMacro => Suite::UmkmProductivity,
            KeywordTracker | HashtagClusterer | CopySwipes => Suite::ShopeeToolkit,
            BatikPatterns | BrandKit | CapcutTemplates => Suite::CanvaAssets,
            PajakCalculator | CashFlow | SopTemplates => Suite::FinancePack,
            RamadanCalendar | WeddingPlanner | YearendPlanner => Suite::Seasonal,
        }
    }

    /// 模板资源ID，相对于模板目录
    pub fn template(&self) -> &'static str {
        match self {
            ProductType::ContentCalendar => "umkm_productivity/content_calendar.html",
            ProductType::CaptionBank => "umkm_productivity/caption_bank.html",
            ProductType::InvoiceMacro => "umkm_productivity/invoice_macro.html",
            ProductType::KeywordTracker => "shopee_toolkit/keyword_tracker.html",
            ProductType::HashtagClusterer => "shopee_toolkit/hashtag_clusterer.html",
            ProductType::CopySwipes => "shopee_toolkit/copy_swipes.html",
            ProductType::BatikPatterns => "canva_assets/batik_patterns.html",
            ProductType::BrandKit => "canva_assets/brand_kit.html",
            ProductType::CapcutTemplates => "canva_assets/capcut_templates.html",
            ProductType::PajakCalculator => "finance_pack/pajak_calculator.html",
            ProductType::CashFlow => "finance_pack/cash_flow.html",
            ProductType::SopTemplates => "finance_pack/sop_templates.html",
            ProductType::RamadanCalendar => "seasonal/ramadan_calendar.html",
            ProductType::WeddingPlanner => "seasonal/wedding_planner.html",
            ProductType::YearendPlanner => "seasonal/yearend_planner.html",
        }
    }

    /// payload必须包含的全部顶层字段
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            ProductType::ContentCalendar => {
                &["name", "description", "month", "year", "calendar_weeks"]
            }
            ProductType::CaptionBank => &["name", "description", "captions"],
            ProductType::InvoiceMacro => &["name", "description", "invoices"],
            ProductType::KeywordTracker => &[
                "name",
                "description",
                "report_date",
                "shop_name",
                "keywords",
                "recommendations",
            ],
            ProductType::HashtagClusterer => &[
                "name",
                "description",
                "clusters",
                "usage_guide",
                "monthly_calendar",
            ],
            ProductType::CopySwipes => &[
                "name",
                "description",
                "categories",
                "swipe_sections",
                "usage_tips",
            ],
            ProductType::BatikPatterns => &[
                "name",
                "description",
                "patterns",
                "usage_examples",
                "license_terms",
            ],
            ProductType::BrandKit => &[
                "name",
                "description",
                "logos",
                "colors",
                "fonts",
                "templates",
                "guidelines",
            ],
            ProductType::CapcutTemplates => &[
                "name",
                "description",
                "categories",
                "templates",
                "tutorial_steps",
            ],
            ProductType::PajakCalculator => &[
                "name",
                "description",
                "sample_data",
                "tax_rules",
                "tax_tips",
                "tax_deadlines",
            ],
            ProductType::CashFlow => &[
                "name",
                "description",
                "summary",
                "transactions",
                "income_categories",
                "expense_categories",
                "projections",
            ],
            ProductType::SopTemplates => &[
                "name",
                "description",
                "sop_categories",
                "sop_documents",
                "version",
                "last_updated",
            ],
            ProductType::RamadanCalendar => &[
                "name",
                "description",
                "location",
                "current_date",
                "prayer_times",
                "calendar_days",
                "content_categories",
                "popular_hashtags",
                "special_days",
            ],
            ProductType::WeddingPlanner => &[
                "name",
                "description",
                "couple_names",
                "wedding_date",
                "total_budget",
                "budget_items",
                "timeline",
                "vendors",
                "guest_stats",
                "guest_list",
                "todo_columns",
                "important_notes",
            ],
            ProductType::YearendPlanner => &[
                "name",
                "description",
                "year",
                "achievements",
                "goal_categories",
                "monthly_breakdown",
                "habits",
                "visions",
                "reflection_prompts",
            ],
        }
    }

    /// 是否附带CSV导出
    pub fn csv_table(&self) -> Option<CsvTable> {
        match self {
            ProductType::CaptionBank => Some(CsvTable {
                field: "captions",
                columns: &["day", "text", "hashtags"],
            }),
            ProductType::KeywordTracker => Some(CsvTable {
                field: "keywords",
                columns: &[
                    "keyword",
                    "search_volume",
                    "competition",
                    "current_position",
                    "previous_position",
                    "change",
                    "cpc_estimate",
                    "recommended_action",
                ],
            }),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductType {
    type Err = AutopreneurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        ProductType::ALL
            .into_iter()
            .find(|product_type| product_type.as_str() == tag)
            .ok_or_else(|| AutopreneurError::UnknownProductType(s.to_string()))
    }
}

/// 根据产品类型取得模板与必填字段
pub fn dispatch(product_type: ProductType) -> Dispatch {
    Dispatch {
        template: product_type.template(),
        required_fields: product_type.required_fields(),
    }
}

/// 按契约顺序返回payload缺失的字段
pub fn validate_payload(product_type: ProductType, payload: &Payload) -> Vec<String> {
    product_type
        .required_fields()
        .iter()
        .filter(|field| !payload.contains_key(**field))
        .map(|field| field.to_string())
        .collect()
}
