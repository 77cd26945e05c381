//! A straight multi-lane road.
//!
//! Lanes run along +x. Lane `i` has its centerline at `y = i * lane_width` and the
//! lanelet id `first_lanelet_id + i`, so a positive lane shift moves left.

use osc_ir::{LaneletId, LaneletPose, Pose};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StraightRoad {
    pub lanes: u32,
    pub lane_width: f64,
    pub first_lanelet_id: LaneletId,
    /// Speed limit shared by every lanelet (m/s).
    pub speed_limit: f64,
}

impl Default for StraightRoad {
    fn default() -> Self {
        StraightRoad {
            lanes: 3,
            lane_width: 3.5,
            first_lanelet_id: 100,
            speed_limit: 50.0 / 3.6,
        }
    }
}

impl StraightRoad {
    pub fn contains(&self, lanelet: LaneletId) -> bool {
        self.index_of(lanelet).is_some()
    }

    fn index_of(&self, lanelet: LaneletId) -> Option<u32> {
        let index = lanelet.checked_sub(self.first_lanelet_id)?;
        u32::try_from(index).ok().filter(|i| *i < self.lanes)
    }

    /// Centerline `y` of a lanelet.
    pub fn center_y(&self, lanelet: LaneletId) -> Option<f64> {
        self.index_of(lanelet)
            .map(|i| f64::from(i) * self.lane_width)
    }

    /// `(left, right)` bound `y` of a lanelet.
    pub fn bounds(&self, lanelet: LaneletId) -> Option<(f64, f64)> {
        let half = self.lane_width * 0.5;
        self.center_y(lanelet).map(|c| (c + half, c - half))
    }

    /// Lanelet whose strip contains `y`.
    pub fn lanelet_at(&self, y: f64) -> Option<LaneletId> {
        let index = (y / self.lane_width).round();
        if !index.is_finite() || index < 0.0 || index >= f64::from(self.lanes) {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "index is a rounded value checked against [0, lanes)"
        )]
        let index = index as u64;
        Some(self.first_lanelet_id + index)
    }

    pub fn to_lanelet_pose(&self, pose: &Pose) -> Option<LaneletPose> {
        let lanelet = self.lanelet_at(pose.position.y)?;
        let center = self.center_y(lanelet)?;
        Some(LaneletPose::new(
            lanelet,
            pose.position.x,
            pose.position.y - center,
        ))
    }

    pub fn to_world(&self, pose: &LaneletPose) -> Option<Pose> {
        let center = self.center_y(pose.lanelet_id)?;
        Some(Pose::new(pose.s, center + pose.offset, 0.0))
    }

    /// Lanelet `shift` lanes to the left of `lanelet`, negative shifts going right.
    pub fn adjacent(&self, lanelet: LaneletId, shift: i32) -> Option<LaneletId> {
        let index = i64::from(self.index_of(lanelet)?) + i64::from(shift);
        let index = u32::try_from(index).ok().filter(|i| *i < self.lanes)?;
        Some(self.first_lanelet_id + u64::from(index))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lanelet_lookup_and_conversion() {
        let road = StraightRoad::default();
        assert_eq!(road.lanelet_at(0.4), Some(100));
        assert_eq!(road.lanelet_at(3.6), Some(101));
        assert_eq!(road.lanelet_at(-3.0), None);
        assert_eq!(road.lanelet_at(20.0), None);

        let pose = road.to_lanelet_pose(&Pose::new(12.0, 7.5, 0.0));
        assert_eq!(pose, Some(LaneletPose::new(102, 12.0, 0.5)));
        assert_eq!(
            road.to_world(&LaneletPose::new(101, 5.0, -0.25)),
            Some(Pose::new(5.0, 3.25, 0.0))
        );
    }

    #[test]
    fn test_adjacent_stays_on_road() {
        let road = StraightRoad::default();
        assert_eq!(road.adjacent(100, 1), Some(101));
        assert_eq!(road.adjacent(101, -1), Some(100));
        assert_eq!(road.adjacent(100, -1), None);
        assert_eq!(road.adjacent(102, 1), None);
        assert_eq!(road.adjacent(7, 0), None);
    }
}
