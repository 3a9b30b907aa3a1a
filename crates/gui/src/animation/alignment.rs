//! Flat stack vs. original depth layout.

use crate::scene::flag::FlagGroup;

/// Depth spacing between consecutive flags in the aligned layout
pub const ALIGN_EPSILON: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentMode {
    /// Each flag at the depth it was built with
    #[default]
    Original,
    /// Flags stacked almost flat, in group order
    Aligned,
}

impl AlignmentMode {
    pub fn from_bool(aligned: bool) -> Self {
        if aligned {
            AlignmentMode::Aligned
        } else {
            AlignmentMode::Original
        }
    }

    pub fn is_aligned(self) -> bool {
        self == AlignmentMode::Aligned
    }

    pub fn label(self) -> &'static str {
        match self {
            AlignmentMode::Original => "original",
            AlignmentMode::Aligned => "aligned",
        }
    }
}

/// Depth a flag takes in `mode`
pub fn target_depth(mode: AlignmentMode, index: usize, original_depth: f32) -> f32 {
    match mode {
        AlignmentMode::Aligned => index as f32 * ALIGN_EPSILON,
        AlignmentMode::Original => original_depth,
    }
}

/// Overwrite every flag's depth for `mode`.
///
/// Directions are left alone, so oscillation continues from the new
/// baseline. Applying the same mode again changes nothing.
pub fn reconcile(group: &mut FlagGroup, mode: AlignmentMode) {
    for (i, flag) in group.flags_mut().iter_mut().enumerate() {
        flag.position.z = target_depth(mode, i, flag.original_depth);
    }
    tracing::debug!("Applied {} layout to {} flags", mode.label(), group.len());
}
