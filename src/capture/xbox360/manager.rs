use crate::capture::events::SubscriptionId;
use crate::capture::xbox360::sdk::{SkeletonFrame, SkeletonSensor, SkeletonSensorProvider, SmoothingParameters};
use crate::tracking::{
    extract_first_tracked, DeviceManager, DeviceType, TrackingData, TrackingListener, TrackingRecord,
    TrackingResult,
};
use std::sync::Arc;

/// Device manager for the skeleton API
pub struct Kinect360Manager {
    provider: Arc<dyn SkeletonSensorProvider>,
    smoothing: SmoothingParameters,
    sensor: Option<Arc<dyn SkeletonSensor>>,
    subscription: Option<SubscriptionId>,
    record: Arc<TrackingRecord>,
}

impl Kinect360Manager {
    pub fn new(provider: Arc<dyn SkeletonSensorProvider>) -> Self {
        Self::with_smoothing(provider, SmoothingParameters::default())
    }

    pub fn with_smoothing(provider: Arc<dyn SkeletonSensorProvider>, smoothing: SmoothingParameters) -> Self {
        Self {
            provider,
            smoothing,
            sensor: None,
            subscription: None,
            record: Arc::new(TrackingRecord::new()),
        }
    }
}

fn on_skeleton_frame(record: &TrackingRecord, frame: Option<&SkeletonFrame>) {
    // No player
    let Some(frame) = frame else {
        tracing::trace!("Skeleton frame could not be acquired");
        return;
    };

    if frame.skeletons.is_empty() {
        return;
    }

    if let Some(joints) = extract_first_tracked(&frame.skeletons) {
        record.publish(&joints);
    }
}

impl DeviceManager for Kinect360Manager {
    fn device_type(&self) -> DeviceType {
        DeviceType::Legacy
    }

    fn set_listener(&mut self, listener: TrackingListener) {
        self.record.set_listener(listener);
    }

    fn is_available(&self) -> bool {
        !self.provider.sensors().is_empty()
    }

    fn start(&mut self) -> TrackingResult<()> {
        self.stop();

        // A missing sensor is not an error for this generation; the caller
        // finds out through is_started().
        let Some(sensor) = self.provider.sensors().into_iter().next() else {
            tracing::warn!("No Kinect 360 sensor connected");
            return Ok(());
        };

        sensor.enable_skeleton_stream(self.smoothing)?;

        let record = self.record.clone();
        let subscription =
            sensor.subscribe(Arc::new(move |frame: Option<&SkeletonFrame>| on_skeleton_frame(&record, frame)));

        if let Err(e) = sensor.start() {
            sensor.unsubscribe(subscription);
            return Err(e);
        }

        tracing::info!("Kinect 360 tracking started on {}", sensor.name());

        self.sensor = Some(sensor);
        self.subscription = Some(subscription);
        Ok(())
    }

    fn stop(&mut self) -> bool {
        let Some(sensor) = self.sensor.take() else {
            return false;
        };

        if let Some(subscription) = self.subscription.take() {
            sensor.unsubscribe(subscription);
        }
        sensor.stop();

        tracing::info!("Kinect 360 tracking stopped");
        true
    }

    fn is_started(&self) -> bool {
        self.sensor.is_some()
    }

    fn is_streaming(&self) -> bool {
        self.sensor.as_ref().is_some_and(|sensor| sensor.is_running())
    }

    fn tracking_data(&self) -> TrackingData {
        self.record.snapshot()
    }
}

impl Drop for Kinect360Manager {
    fn drop(&mut self) {
        self.stop();
    }
}
