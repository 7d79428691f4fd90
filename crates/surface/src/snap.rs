/// Grid quantization applied to every user-derived time value before
/// it is written into model or view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapPolicy {
    pub enabled: bool,
    pub grid_ms: i64,
}

impl Default for SnapPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            grid_ms: 50,
        }
    }
}

impl SnapPolicy {
    /// Quantizes `value` down to the grid; identity when disabled.
    pub fn snap(&self, value: i64) -> i64 {
        if !self.enabled {
            return value;
        }
        value - value.rem_euclid(self.grid_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::SnapPolicy;

    #[test]
    fn snaps_down_to_grid_multiples() {
        let snap = SnapPolicy::default();

        assert_eq!(snap.snap(90), 50);
        assert_eq!(snap.snap(49), 0);
        assert_eq!(snap.snap(1_950), 1_950);
    }

    #[test]
    fn snap_is_idempotent() {
        let snap = SnapPolicy::default();

        for value in [0, 7, 49, 50, 51, 12_345] {
            assert_eq!(snap.snap(snap.snap(value)), snap.snap(value));
            assert_eq!(snap.snap(value) % snap.grid_ms, 0);
        }
    }

    #[test]
    fn disabled_policy_is_identity() {
        let snap = SnapPolicy {
            enabled: false,
            grid_ms: 50,
        };

        assert_eq!(snap.snap(73), 73);
    }
}
