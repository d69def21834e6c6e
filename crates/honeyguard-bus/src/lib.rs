use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use honeyguard_schema::BusMessage;
use tokio::sync::{mpsc, RwLock};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    StatsRefreshed,
    IntelRefreshed,
    ReportCompleted,
}

impl Topic {
    pub fn from_message(msg: &BusMessage) -> Self {
        match msg {
            BusMessage::StatsRefreshed { .. } => Topic::StatsRefreshed,
            BusMessage::IntelRefreshed { .. } => Topic::IntelRefreshed,
            BusMessage::ReportCompleted { .. } => Topic::ReportCompleted,
        }
    }
}

type Subscriber = mpsc::Sender<BusMessage>;
type SubscriberMap = Arc<RwLock<HashMap<Topic, Vec<Subscriber>>>>;

pub struct EventBus {
    subscribers: SubscriberMap,
    capacity: usize,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    pub async fn subscribe(&self, topic: Topic) -> mpsc::Receiver<BusMessage> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let mut subs = self.subscribers.write().await;
        subs.entry(topic).or_default().push(tx);
        rx
    }

    pub async fn publish(&self, msg: BusMessage) -> Result<()> {
        deliver(&self.subscribers, msg).await
    }

    pub fn publisher(&self) -> BusPublisher {
        BusPublisher {
            subscribers: self.subscribers.clone(),
        }
    }
}

#[derive(Clone)]
pub struct BusPublisher {
    subscribers: SubscriberMap,
}

impl BusPublisher {
    pub async fn publish(&self, msg: BusMessage) -> Result<()> {
        deliver(&self.subscribers, msg).await
    }
}

/// Fan a message out to every live subscriber of its topic. Full or closed
/// channels drop the message; closed ones are pruned.
async fn deliver(subscribers: &SubscriberMap, msg: BusMessage) -> Result<()> {
    let topic = Topic::from_message(&msg);
    let mut subs = subscribers.write().await;
    if let Some(list) = subs.get_mut(&topic) {
        list.retain(|tx| !tx.is_closed());
        for tx in list.iter() {
            if tx.try_send(msg.clone()).is_err() {
                tracing::debug!(?topic, "subscriber full, dropping message");
            }
        }
    }
    Ok(())
}
