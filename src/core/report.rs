use crate::core::kpi::sort_by_total;
use crate::domain::model::{KpiGroup, Report};
use chrono::Utc;

/// 組裝報表資料 (不含任何排版)
pub fn assemble(mut groups: Vec<KpiGroup>, provenance: impl Into<String>) -> Report {
    sort_by_total(&mut groups);
    Report {
        groups,
        provenance: provenance.into(),
        generated_at: Utc::now(),
    }
}

impl Report {
    pub fn total_detections(&self) -> usize {
        self.groups.iter().map(KpiGroup::total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kpi::aggregate;
    use crate::domain::model::Detection;

    #[test]
    fn test_assemble_orders_groups() {
        let mut groups = aggregate(&[
            Detection::new("pole", 0.9),
            Detection::new("meter", 0.1),
            Detection::new("meter", 0.3),
        ]);
        groups.reverse();

        let before = Utc::now();
        let report = assemble(groups, "gs://bucket/run-1");
        assert_eq!(report.groups[0].class_name(), "meter");
        assert_eq!(report.provenance, "gs://bucket/run-1");
        assert_eq!(report.total_detections(), 3);
        assert!(report.generated_at >= before);
    }

    #[test]
    fn test_empty_report() {
        let report = assemble(Vec::new(), "local");
        assert!(report.is_empty());
        assert_eq!(report.total_detections(), 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["groups"], serde_json::json!([]));
    }
}
