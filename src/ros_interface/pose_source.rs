//! Pose acquisition with transient-unavailability handling
//!
//! Localization is expected to be unavailable for a while after startup, so
//! lookups return a typed "not yet available" result instead of an error,
//! and the startup seeding retries with a bounded backoff rather than
//! busy-waiting forever.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::executor::LocalSpawner;
use futures::stream::StreamExt;
use futures::task::LocalSpawnExt;
#[cfg(test)]
use mockall::automock;
use r2r::QosProfile;

use crate::metrics::Pose2D;
use crate::MetricsError;

/// Outcome of one pose lookup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseLookup {
    /// A pose estimate is available
    Available(Pose2D),
    /// Localization has not produced an estimate yet; retry later
    NotYetAvailable,
}

/// Best-effort supplier of pose estimates.
///
/// `Ok(PoseLookup::NotYetAvailable)` is the expected transient state before
/// localization is ready; `Err` is reserved for hard failures.
#[cfg_attr(test, automock)]
pub trait PoseSource {
    /// Returns the latest pose estimate, if one exists yet.
    fn lookup(&mut self) -> Result<PoseLookup, MetricsError>;
}

/// Pose source backed by the `/tf` transform stream.
///
/// Caches the translation of the latest `global_frame -> base_frame`
/// transform; the cache is filled by a task running on the node's local
/// executor, so `lookup` itself never blocks.
pub struct TfPoseSource {
    latest: Arc<Mutex<Option<Pose2D>>>,
}

impl TfPoseSource {
    /// Subscribes to `/tf` and starts caching matching transforms.
    pub fn new(
        node: &mut r2r::Node,
        spawner: &LocalSpawner,
        global_frame: &str,
        base_frame: &str,
    ) -> Result<Self, MetricsError> {
        let transforms =
            node.subscribe::<r2r::tf2_msgs::msg::TFMessage>("/tf", QosProfile::default())?;
        let latest = Arc::new(Mutex::new(None));
        let cache = latest.clone();
        let global_frame = global_frame.to_string();
        let base_frame = base_frame.to_string();
        spawner
            .spawn_local(async move {
                transforms
                    .for_each(|msg| {
                        for tf in &msg.transforms {
                            if tf.header.frame_id == global_frame
                                && tf.child_frame_id == base_frame
                            {
                                *cache.lock().unwrap() = Some(Pose2D {
                                    x: tf.transform.translation.x,
                                    y: tf.transform.translation.y,
                                });
                            }
                        }
                        futures::future::ready(())
                    })
                    .await
            })
            .map_err(|e| MetricsError::Ros(e.to_string()))?;
        Ok(TfPoseSource { latest })
    }
}

impl PoseSource for TfPoseSource {
    fn lookup(&mut self) -> Result<PoseLookup, MetricsError> {
        Ok(match *self.latest.lock().unwrap() {
            Some(pose) => PoseLookup::Available(pose),
            None => PoseLookup::NotYetAvailable,
        })
    }
}

/// Longest interval between two startup lookup attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(1);

/// Polls `source` until a pose is available, driving `spin` between
/// attempts with a doubling interval capped at one second.
///
/// Returns [`MetricsError::PoseUnavailable`] once `max_attempts` lookups
/// have come back empty, so startup cannot hang forever on a silent
/// localization stack.
pub fn await_initial_pose<S, F>(
    source: &mut S,
    mut spin: F,
    max_attempts: u32,
    initial_interval: Duration,
) -> Result<Pose2D, MetricsError>
where
    S: PoseSource,
    F: FnMut(Duration),
{
    let mut interval = initial_interval;
    for _ in 0..max_attempts {
        match source.lookup()? {
            PoseLookup::Available(pose) => return Ok(pose),
            PoseLookup::NotYetAvailable => {
                spin(interval);
                interval = (interval * 2).min(MAX_BACKOFF);
            }
        }
    }
    Err(MetricsError::PoseUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_pose_returned_once_available() {
        let mut source = MockPoseSource::new();
        let mut seq = mockall::Sequence::new();
        source
            .expect_lookup()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|| Ok(PoseLookup::NotYetAvailable));
        source
            .expect_lookup()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(PoseLookup::Available(Pose2D { x: 1.0, y: 2.0 })));

        let mut spins = 0;
        let pose =
            await_initial_pose(&mut source, |_| spins += 1, 10, Duration::from_millis(100))
                .unwrap();

        assert_eq!(pose, Pose2D { x: 1.0, y: 2.0 });
        assert_eq!(spins, 2);
    }

    #[test]
    fn initial_pose_gives_up_at_the_attempt_cap() {
        let mut source = MockPoseSource::new();
        source
            .expect_lookup()
            .times(3)
            .returning(|| Ok(PoseLookup::NotYetAvailable));

        let err = await_initial_pose(&mut source, |_| {}, 3, Duration::from_millis(100))
            .unwrap_err();

        assert!(matches!(err, MetricsError::PoseUnavailable));
    }

    #[test]
    fn backoff_doubles_up_to_the_cap() {
        let mut source = MockPoseSource::new();
        source
            .expect_lookup()
            .times(4)
            .returning(|| Ok(PoseLookup::NotYetAvailable));

        let mut intervals = Vec::new();
        let _ = await_initial_pose(&mut source, |d| intervals.push(d), 4, Duration::from_millis(400));

        assert_eq!(
            intervals,
            vec![
                Duration::from_millis(400),
                Duration::from_millis(800),
                Duration::from_secs(1),
                Duration::from_secs(1),
            ]
        );
    }
}
