use crate::domain::model::{Detection, KpiGroup, ScoreRange};
use std::collections::HashMap;

/// Order groups by total, largest first; equal totals keep their current order.
pub fn sort_by_total(groups: &mut [KpiGroup]) {
    groups.sort_by(|a, b| b.total().cmp(&a.total()));
}

/// 依類別彙整信心分數分布
///
/// Expects the merged detections of every file as one batch.
pub fn aggregate(detections: &[Detection]) -> Vec<KpiGroup> {
    let mut groups: Vec<KpiGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for detection in detections {
        let position = *index.entry(detection.class_name()).or_insert_with(|| {
            groups.push(KpiGroup::new(detection.class_name()));
            groups.len() - 1
        });
        groups[position].record(ScoreRange::for_score(detection.score()));
    }

    sort_by_total(&mut groups);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meter_and_pole() {
        let detections = vec![
            Detection::new("meter", 0.05),
            Detection::new("meter", 0.95),
            Detection::new("pole", 0.95),
        ];

        let groups = aggregate(&detections);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].class_name(), "meter");
        assert_eq!(groups[0].total(), 2);
        assert_eq!(groups[0].count(ScoreRange::VeryLow), 1);
        assert_eq!(groups[0].count(ScoreRange::High), 1);
        assert_eq!(groups[1].class_name(), "pole");
        assert_eq!(groups[1].total(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let detections = vec![
            Detection::new("b", 0.5),
            Detection::new("a", 0.5),
            Detection::new("c", 0.5),
            Detection::new("c", 0.6),
        ];
        let names: Vec<_> = aggregate(&detections)
            .iter()
            .map(|g| g.class_name().to_string())
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }
}
