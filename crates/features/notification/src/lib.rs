//! # Notifications
//!
//! Background listeners that mail the people affected by a domain event.
//! Delivery problems are logged and never reach the request that raised
//! the event.

mod dispatcher;
mod error;
mod mailer;
mod notice;

pub use dispatcher::Dispatcher;
pub use error::{NotificationError, NotificationErrorExt};
pub use mailer::{LogMailer, MailMessage, Mailer};
pub use notice::{Audience, Notice};

use dispatcher::listen;
use std::sync::Arc;
use thesis_event_bus::EventBus;
use thesis_group::GroupService;
use thesis_identity::UserService;
use thesis_kernel::domain::config::MailConfig;
use thesis_kernel::domain::events::{
    CouncilMemberAdded, GroupAssignedToCouncil, GroupMemberAdded, MeetingScheduled,
    MentorAssigned, TopicReviewed,
};
use tokio::task::JoinHandle;

/// Running listener tasks, one per event type.
#[derive(Debug)]
pub struct Notifications {
    tasks: Vec<JoinHandle<()>>,
}

impl Notifications {
    #[must_use]
    pub const fn listeners(&self) -> usize {
        self.tasks.len()
    }

    pub fn shutdown(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Starts the listeners with the given mailer. Must run inside a Tokio runtime.
pub fn start<M: Mailer>(
    events: &EventBus,
    mailer: M,
    config: &MailConfig,
    users: UserService,
    groups: GroupService,
) -> Result<Notifications, NotificationError> {
    let dispatcher = Arc::new(Dispatcher::new(mailer, config, users, groups));
    let tasks = vec![
        listen::<GroupMemberAdded, _>(events, dispatcher.clone())?,
        listen::<MentorAssigned, _>(events, dispatcher.clone())?,
        listen::<TopicReviewed, _>(events, dispatcher.clone())?,
        listen::<CouncilMemberAdded, _>(events, dispatcher.clone())?,
        listen::<GroupAssignedToCouncil, _>(events, dispatcher.clone())?,
        listen::<MeetingScheduled, _>(events, dispatcher)?,
    ];
    tracing::info!(listeners = tasks.len(), "Notification slice initialized");
    Ok(Notifications { tasks })
}

/// [`start`] with the logging mailer.
pub fn init(
    events: &EventBus,
    config: &MailConfig,
    users: UserService,
    groups: GroupService,
) -> Result<Notifications, NotificationError> {
    start(events, LogMailer::new(config), config, users, groups)
}
