use crate::error::NotificationError;
use crate::mailer::{MailMessage, Mailer};
use crate::notice::{Audience, Notice};
use std::sync::Arc;
use thesis_event_bus::{EventBus, Subscription};
use thesis_group::GroupService;
use thesis_identity::UserService;
use thesis_kernel::domain::config::MailConfig;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Resolves audiences to addresses and hands messages to the mailer.
#[derive(Debug)]
pub struct Dispatcher<M> {
    mailer: M,
    users: UserService,
    groups: GroupService,
    from: String,
    subject_prefix: String,
}

impl<M: Mailer> Dispatcher<M> {
    pub fn new(mailer: M, config: &MailConfig, users: UserService, groups: GroupService) -> Self {
        Self {
            mailer,
            users,
            groups,
            from: config.from.clone(),
            subject_prefix: config.subject_prefix.clone(),
        }
    }

    /// Sends one notice and returns the number of recipients.
    pub async fn deliver<N: Notice>(&self, notice: &N) -> Result<usize, NotificationError> {
        let mut ids = match notice.audience() {
            Audience::Users(ids) => ids,
            Audience::Group { group_id, extra } => {
                let group = self.groups.get(&group_id).await?;
                group.members.into_iter().map(|m| m.student_id).chain(extra).collect()
            },
        };
        ids.sort_unstable();
        ids.dedup();

        let to: Vec<String> =
            self.users.find_active(ids).await?.into_iter().map(|user| user.email).collect();
        if to.is_empty() {
            debug!(subject = %notice.subject(), "No active recipient, notice dropped");
            return Ok(0);
        }

        let subject = match self.subject_prefix.trim() {
            "" => notice.subject(),
            prefix => format!("{prefix} {}", notice.subject()),
        };
        let message = MailMessage { from: self.from.clone(), to, subject, body: notice.body() };
        self.mailer.send(&message).await?;
        Ok(message.to.len())
    }
}

/// Subscribes to `N` and delivers every event until the bus goes away.
pub(crate) fn listen<N, M>(
    events: &EventBus,
    dispatcher: Arc<Dispatcher<M>>,
) -> Result<JoinHandle<()>, NotificationError>
where
    N: Notice,
    M: Mailer,
{
    let mut rx = events.subscribe::<N>()?;
    Ok(tokio::spawn(async move {
        while let Some(event) = rx.next().await {
            if let Err(err) = dispatcher.deliver(&*event).await {
                warn!(event = std::any::type_name::<N>(), error = %err, "Notification failed");
            }
        }
    }))
}
