//! Plain-text rendering of a detailed record

use std::fmt;

use annals_core::{DetailedRecord, Era};

/// A record laid out under its era's heading
pub struct RecordView<'a> {
    era: &'a Era,
    record: &'a DetailedRecord,
}

impl<'a> RecordView<'a> {
    pub fn new(era: &'a Era, record: &'a DetailedRecord) -> Self {
        Self { era, record }
    }
}

impl fmt::Display for RecordView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (era, record) = (self.era, self.record);

        writeln!(f, "{} · {}", era.localized_name, era.name)?;
        writeln!(f, "{}", era.period)?;
        writeln!(f)?;
        writeln!(f, "{}", record.introduction)?;
        writeln!(f)?;
        writeln!(f, "重要统治者: {}", record.leader)?;
        writeln!(f, "都城:       {}", record.capital)?;
        writeln!(f, "主流思想:   {}", record.dominant_philosophy)?;
        writeln!(f)?;

        writeln!(f, "历史里程碑")?;
        for event in &record.major_events {
            writeln!(f, "  [{}] {}", event.year, event.event)?;
            writeln!(f, "      {}", event.description)?;
        }
        writeln!(f)?;

        writeln!(f, "文化遗产")?;
        for item in &record.cultural_achievements {
            writeln!(f, "  - {item}")?;
        }
        writeln!(f)?;

        writeln!(f, "王朝兴衰")?;
        writeln!(f, "  \"{}\"", record.decline_narrative)
    }
}
