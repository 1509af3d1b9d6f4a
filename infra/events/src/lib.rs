//! # Event Bus
//!
//! Typed fan-out channels shared by the feature slices. A slice publishes a
//! domain event after its write commits; other slices (notifications) react
//! without the publisher knowing about them.
//!
//! Each event type gets its own `tokio::sync::broadcast` channel, created on
//! first use and looked up by [`TypeId`].
//!
//! ```rust
//! use thesis_event_bus::{EventBus, EventBusError, Subscription};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct GroupCreated { code: String }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), EventBusError> {
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe::<GroupCreated>()?;
//! bus.publish(GroupCreated { code: "SU25-G001".into() })?;
//! assert_eq!(rx.next().await.unwrap().code, "SU25-G001");
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::{EventBusError, EventBusErrorExt};

use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Buffer per event type; notification traffic is low-volume.
const DEFAULT_CAPACITY: usize = 128;

/// Anything that can travel over the bus.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

type Channels = FxHashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Cheaply cloneable handle to the shared channel registry.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<Channels>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `T` with the default buffer.
    ///
    /// # Errors
    /// [`EventBusError::TypeMismatch`] if the registry is corrupted.
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to `T`; `capacity` only matters when this call creates the channel.
    ///
    /// # Errors
    /// [`EventBusError::InvalidCapacity`] for a zero capacity.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be greater than zero".into(),
                context: Some(type_name::<T>().into()),
            });
        }
        Ok(self.sender::<T>(capacity)?.subscribe())
    }

    /// Publishes `event` to every current subscriber of `T` and returns how
    /// many received it. Publishing with no subscriber is not an error.
    ///
    /// # Errors
    /// [`EventBusError::TypeMismatch`] if the registry is corrupted.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        let sender = self.sender::<T>(DEFAULT_CAPACITY)?;
        let delivered = sender.send(Arc::new(event)).unwrap_or(0);
        trace!(event = type_name::<T>(), delivered, "Event published");
        Ok(delivered)
    }

    /// Number of live subscribers for `T`.
    #[must_use]
    pub fn subscriber_count<T: Event>(&self) -> usize {
        self.channels
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_ref::<broadcast::Sender<Arc<T>>>())
            .map_or(0, broadcast::Sender::receiver_count)
    }

    fn sender<T: Event>(&self, capacity: usize) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();

        if let Some(slot) = self.channels.read().get(&id) {
            return downcast::<T>(slot.as_ref());
        }

        let mut channels = self.channels.write();
        let slot = channels
            .entry(id)
            .or_insert_with(|| Box::new(broadcast::channel::<Arc<T>>(capacity).0));
        downcast::<T>(slot.as_ref())
    }
}

fn downcast<T: Event>(
    slot: &(dyn Any + Send + Sync),
) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
    slot.downcast_ref::<broadcast::Sender<Arc<T>>>().cloned().ok_or_else(|| {
        EventBusError::TypeMismatch {
            message: type_name::<T>().into(),
            context: Some("Channel registered with another payload type".into()),
        }
    })
}

/// Lag-tolerant receiving for broadcast subscriptions.
pub trait Subscription<T> {
    /// Next event, skipping over anything lost to lag; `None` once the bus is gone.
    fn next(&mut self) -> impl Future<Output = Option<Arc<T>>> + Send;
}

impl<T: Event> Subscription<T> for broadcast::Receiver<Arc<T>> {
    async fn next(&mut self) -> Option<Arc<T>> {
        loop {
            match self.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(event = type_name::<T>(), skipped, "Subscriber lagged behind the bus");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
