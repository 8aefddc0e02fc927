//! Accelerometer sampling.

use std::time::Duration;

/// One accelerometer sample in m/s².
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A sensor whose samples are queued on the event loop's looper.
pub trait MotionSensor {
    fn enable(&mut self, period: Duration);
    fn disable(&mut self);
    /// Pops the next pending sample without blocking.
    fn next_sample(&mut self) -> Option<Acceleration>;
}

#[cfg(target_os = "android")]
pub use self::android::Accelerometer;

#[cfg(target_os = "android")]
mod android {
    use std::ptr::NonNull;
    use std::time::Duration;

    use log::{debug, warn};
    use ndk::looper::ThreadLooper;
    use ndk_sys as ffi;

    use super::{Acceleration, MotionSensor};

    const ASENSOR_TYPE_ACCELEROMETER: i32 = 1;

    /// Mirror of `ASensorEvent` with the payload union read as plain floats.
    #[repr(C)]
    #[allow(dead_code)]
    struct RawSensorEvent {
        version: i32,
        sensor: i32,
        kind: i32,
        reserved0: i32,
        timestamp: i64,
        data: [f32; 16],
        flags: u32,
        reserved1: [i32; 3],
    }

    /// The default accelerometer and an event queue attached to the
    /// calling thread's looper.
    pub struct Accelerometer {
        manager: NonNull<ffi::ASensorManager>,
        sensor: NonNull<ffi::ASensor>,
        queue: NonNull<ffi::ASensorEventQueue>,
        enabled: bool,
    }

    impl Accelerometer {
        /// Returns `None` when the device has no accelerometer or the queue
        /// cannot be created.
        pub fn for_thread(looper: &ThreadLooper, ident: i32) -> Option<Self> {
            #[allow(deprecated)]
            let manager = NonNull::new(unsafe { ffi::ASensorManager_getInstance() })?;
            let sensor = unsafe {
                ffi::ASensorManager_getDefaultSensor(manager.as_ptr(), ASENSOR_TYPE_ACCELEROMETER)
            };
            let sensor = NonNull::new(sensor as *mut ffi::ASensor)?;
            let queue = unsafe {
                ffi::ASensorManager_createEventQueue(
                    manager.as_ptr(),
                    looper.as_foreign().ptr().as_ptr(),
                    ident,
                    None,
                    std::ptr::null_mut(),
                )
            };
            let Some(queue) = NonNull::new(queue) else {
                warn!("Unable to create the sensor event queue");
                return None;
            };
            Some(Accelerometer {
                manager,
                sensor,
                queue,
                enabled: false,
            })
        }
    }

    impl MotionSensor for Accelerometer {
        fn enable(&mut self, period: Duration) {
            let usec = i32::try_from(period.as_micros()).unwrap_or(i32::MAX);
            let (queue, sensor) = (self.queue.as_ptr(), self.sensor.as_ptr());
            unsafe {
                if ffi::ASensorEventQueue_enableSensor(queue, sensor) < 0 {
                    warn!("Unable to enable the accelerometer");
                    return;
                }
                if ffi::ASensorEventQueue_setEventRate(queue, sensor, usec) < 0 {
                    warn!("Unable to set the accelerometer rate to {usec}us");
                }
            }
            self.enabled = true;
            debug!("Accelerometer enabled, period {usec}us");
        }

        fn disable(&mut self) {
            if !self.enabled {
                return;
            }
            unsafe {
                ffi::ASensorEventQueue_disableSensor(self.queue.as_ptr(), self.sensor.as_ptr());
            }
            self.enabled = false;
            debug!("Accelerometer disabled");
        }

        fn next_sample(&mut self) -> Option<Acceleration> {
            let mut event = std::mem::MaybeUninit::<RawSensorEvent>::uninit();
            let read = unsafe {
                ffi::ASensorEventQueue_getEvents(
                    self.queue.as_ptr(),
                    event.as_mut_ptr().cast::<ffi::ASensorEvent>(),
                    1,
                )
            };
            if read <= 0 {
                return None;
            }
            let event = unsafe { event.assume_init() };
            Some(Acceleration {
                x: event.data[0],
                y: event.data[1],
                z: event.data[2],
            })
        }
    }

    impl Drop for Accelerometer {
        fn drop(&mut self) {
            self.disable();
            unsafe {
                ffi::ASensorManager_destroyEventQueue(self.manager.as_ptr(), self.queue.as_ptr());
            }
        }
    }
}
