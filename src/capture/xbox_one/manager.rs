use crate::capture::events::SubscriptionId;
use crate::capture::xbox_one::sdk::{BodyFrame, BodySensor, BodySensorProvider};
use crate::tracking::{
    extract_first_tracked, DeviceManager, DeviceType, TrackingData, TrackingError, TrackingListener,
    TrackingRecord, TrackingResult,
};
use std::sync::Arc;

/// Device manager for the body API
pub struct KinectOneManager {
    provider: Arc<dyn BodySensorProvider>,
    sensor: Option<Arc<dyn BodySensor>>,
    subscription: Option<SubscriptionId>,
    record: Arc<TrackingRecord>,
}

impl KinectOneManager {
    pub fn new(provider: Arc<dyn BodySensorProvider>) -> Self {
        Self {
            provider,
            sensor: None,
            subscription: None,
            record: Arc::new(TrackingRecord::new()),
        }
    }
}

fn on_body_frame(record: &TrackingRecord, frame: Option<&BodyFrame>) {
    let Some(frame) = frame else {
        tracing::trace!("Body frame could not be acquired");
        return;
    };

    if frame.body_count() == 0 {
        return;
    }

    if let Some(joints) = extract_first_tracked(frame.bodies.iter().flatten()) {
        record.publish(&joints);
    }
}

impl DeviceManager for KinectOneManager {
    fn device_type(&self) -> DeviceType {
        DeviceType::Modern
    }

    fn set_listener(&mut self, listener: TrackingListener) {
        self.record.set_listener(listener);
    }

    fn is_available(&self) -> bool {
        self.provider
            .default_sensor()
            .map(|sensor| sensor.is_available())
            .unwrap_or(false)
    }

    fn start(&mut self) -> TrackingResult<()> {
        self.stop();

        let sensor = self
            .provider
            .default_sensor()
            .ok_or_else(|| TrackingError::DeviceNotFound("no Kinect One sensor attached".to_string()))?;

        let record = self.record.clone();
        let subscription =
            sensor.subscribe(Arc::new(move |frame: Option<&BodyFrame>| on_body_frame(&record, frame)));

        if let Err(e) = sensor.open() {
            sensor.unsubscribe(subscription);
            return Err(e);
        }

        tracing::info!("Kinect One tracking started on {}", sensor.name());

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
        sensor.close();

        tracing::info!("Kinect One tracking stopped");
        true
    }

    fn is_started(&self) -> bool {
        self.sensor.is_some()
    }

    fn is_streaming(&self) -> bool {
        self.sensor.as_ref().is_some_and(|sensor| sensor.is_open())
    }

    fn tracking_data(&self) -> TrackingData {
        self.record.snapshot()
    }
}

impl Drop for KinectOneManager {
    fn drop(&mut self) {
        self.stop();
    }
}
