//! Structured-output schema sent with every request
//!
//! Uses the provider's OpenAPI-subset dialect (uppercase type names).

use serde_json::{json, Value};
use std::sync::OnceLock;

/// Top-level keys of a detailed record, in display order
pub const REQUIRED_FIELDS: [&str; 7] = [
    "introduction",
    "leader",
    "capital",
    "dominantPhilosophy",
    "majorEvents",
    "culturalAchievements",
    "declineNarrative",
];

/// The fixed response schema
pub fn response_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        json!({
            "type": "OBJECT",
            "properties": {
                "introduction": {
                    "type": "STRING",
                    "description": "关于该朝代历史地位的详细介绍段落。"
                },
                "leader": {
                    "type": "STRING",
                    "description": "开国皇帝或最著名的统治者姓名。"
                },
                "capital": {
                    "type": "STRING",
                    "description": "该时期的主要都城。"
                },
                "dominantPhilosophy": {
                    "type": "STRING",
                    "description": "主导思想、哲学或宗教（例如：儒家思想、佛教）。"
                },
                "majorEvents": {
                    "type": "ARRAY",
                    "description": "3-4个主要历史事件的列表，按时间顺序排列。",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "year": { "type": "STRING" },
                            "event": { "type": "STRING" },
                            "description": { "type": "STRING" }
                        },
                        "required": ["year", "event", "description"]
                    }
                },
                "culturalAchievements": {
                    "type": "ARRAY",
                    "description": "4-5项关键的文化、科学或艺术成就。",
                    "items": { "type": "STRING" }
                },
                "declineNarrative": {
                    "type": "STRING",
                    "description": "简要解释朝代灭亡的原因。"
                }
            },
            "required": REQUIRED_FIELDS,
            "propertyOrdering": REQUIRED_FIELDS
        })
    })
}
