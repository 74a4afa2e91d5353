//! Visibility filter for laid out slices.

use tracing::debug;

use crate::domain::partition::Slice;

/// Default minimum angular span (radians) for a slice to be kept.
pub const DEFAULT_MIN_RADIANS: f64 = 0.001;

/// Keep slices whose span is strictly greater than `min_radians`.
///
/// Space of dropped slices is not handed to their siblings.
pub fn retain_visible(slices: Vec<Slice>, min_radians: f64) -> Vec<Slice> {
    let before = slices.len();
    let visible: Vec<Slice> = slices
        .into_iter()
        .filter(|slice| slice.span() > min_radians)
        .collect();
    if visible.len() != before {
        debug!(
            "dropped {} of {} slices at or below {} rad",
            before - visible.len(),
            before,
            min_radians
        );
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::HierarchyBuilder;
    use crate::domain::entities::TreeNode;
    use crate::domain::partition::PartitionLayout;

    fn slices_with_span(span: f64) -> Vec<Slice> {
        let tree = HierarchyBuilder::default()
            .build(&TreeNode::branch("r", vec![TreeNode::leaf("a", 1.0)]))
            .unwrap();
        let mut slices = PartitionLayout::new(100.0).layout(&tree);
        slices[1].x0 = 1.0;
        slices[1].x1 = 1.0 + span;
        slices
    }

    #[test]
    fn given_span_equal_to_threshold_when_filtering_then_excluded() {
        let slices = slices_with_span(0.5);
        let threshold = slices[1].span();
        let visible = retain_visible(slices, threshold);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].data.name, "r");
    }

    #[test]
    fn given_span_just_above_threshold_when_filtering_then_included() {
        let slices = slices_with_span(0.5 + 1e-9);
        let visible = retain_visible(slices, 0.5);
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn given_threshold_of_full_circle_when_filtering_then_root_dropped_too() {
        let slices = slices_with_span(0.5);
        assert!(retain_visible(slices, std::f64::consts::TAU).is_empty());
    }
}
