//! ROS 2 interface for Argus
//!
//! This module handles all communication with ROS 2:
//! - Subscribing to the velocity-command and laser-scan streams
//! - Feeding the `/tf`-backed pose source
//! - Driving the node and the local executor from one thread
//!
//! Stream callbacks run on a single-threaded local pool that is only ever
//! drained from [`RosInterface::spin_once`]; together with the periodic
//! tick running on the same thread, this serializes every mutating entry
//! point of the aggregator.

mod pose_source;

pub use pose_source::{await_initial_pose, PoseLookup, PoseSource, TfPoseSource};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::executor::LocalPool;
use futures::stream::StreamExt;
use futures::task::LocalSpawnExt;
use r2r::QosProfile;

use crate::metrics::MetricsAggregator;
use crate::{MetricsConfig, MetricsError};

/// ROS 2 interface manager: node, subscriptions, and the local executor
pub struct RosInterface {
    node: r2r::Node,
    pool: LocalPool,
}

impl RosInterface {
    /// Creates the ROS 2 context and node.
    pub fn new(node_name: &str) -> Result<Self, MetricsError> {
        let ctx = r2r::Context::create()?;
        let node = r2r::Node::create(ctx, node_name, "")?;
        Ok(RosInterface {
            node,
            pool: LocalPool::new(),
        })
    }

    /// Creates the `/tf`-backed pose source on this node.
    pub fn pose_source(&mut self, config: &MetricsConfig) -> Result<TfPoseSource, MetricsError> {
        TfPoseSource::new(
            &mut self.node,
            &self.pool.spawner(),
            &config.global_frame,
            &config.base_frame,
        )
    }

    /// Subscribes the velocity and range streams, forwarding every sample
    /// into the aggregator.
    ///
    /// Ingestion is fire-and-forget and never blocks the executor; a
    /// contract-violating sample is logged and dropped.
    pub fn subscribe_streams(
        &mut self,
        aggregator: Arc<Mutex<MetricsAggregator>>,
        config: &MetricsConfig,
    ) -> Result<(), MetricsError> {
        let scans = self
            .node
            .subscribe::<r2r::sensor_msgs::msg::LaserScan>(&config.scan_topic, QosProfile::default())?;
        let agg = aggregator.clone();
        self.pool
            .spawner()
            .spawn_local(async move {
                scans
                    .for_each(|scan| {
                        let ranges: Vec<f64> =
                            scan.ranges.iter().map(|&r| f64::from(r)).collect();
                        if let Err(e) = agg.lock().unwrap().on_range(&ranges) {
                            log::error!("dropping scan sample: {}", e);
                        }
                        futures::future::ready(())
                    })
                    .await
            })
            .map_err(|e| MetricsError::Ros(e.to_string()))?;

        let commands = self
            .node
            .subscribe::<r2r::geometry_msgs::msg::Twist>(&config.cmd_vel_topic, QosProfile::default())?;
        let agg = aggregator;
        self.pool
            .spawner()
            .spawn_local(async move {
                commands
                    .for_each(|twist| {
                        agg.lock().unwrap().on_velocity(twist.linear.x, twist.angular.z);
                        futures::future::ready(())
                    })
                    .await
            })
            .map_err(|e| MetricsError::Ros(e.to_string()))?;

        log::info!(
            "subscribed to {} and {}",
            config.scan_topic,
            config.cmd_vel_topic
        );
        Ok(())
    }

    /// Processes pending ROS work, then drains the local pool once.
    pub fn spin_once(&mut self, timeout: Duration) {
        self.node.spin_once(timeout);
        self.pool.run_until_stalled();
    }
}
