//! Flow records - scheduled outbound messaging campaigns.

use std::collections::BTreeSet;
use std::fmt;

/// Priority assumed for flows that do not declare one.
pub const DEFAULT_PRIORITY: u8 = 50;

/// Highest priority on the 0-100 scale.
pub const MAX_PRIORITY: u8 = 100;

/// A delivery medium a flow sends through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Channel {
    Email,
    Sms,
    Push,
    #[cfg_attr(feature = "serde", serde(alias = "in-app", alias = "inapp"))]
    InApp,
    Webhook,
}

impl Channel {
    /// Returns the canonical lower-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Push => "push",
            Channel::InApp => "in_app",
            Channel::Webhook => "webhook",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What causes a flow to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TriggerKind {
    /// Fired by a user or system event.
    #[cfg_attr(feature = "serde", serde(alias = "event-based", alias = "event_based"))]
    Event,
    /// Fired on a calendar schedule.
    Scheduled,
    /// Fired by an operator.
    Manual,
}

impl TriggerKind {
    pub fn is_event(&self) -> bool {
        matches!(self, TriggerKind::Event)
    }
}

/// Sending cadence parsed from a flow's free-text frequency descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cadence {
    /// The descriptor mentions "daily".
    Daily,
    /// The descriptor mentions "profile" (sends driven by profile changes).
    ProfileBased,
    /// Anything else, including an absent descriptor.
    Other,
}

impl Cadence {
    /// Classify a frequency descriptor. Matching is case-insensitive and
    /// "daily" takes precedence over "profile".
    pub fn parse(frequency: Option<&str>) -> Self {
        let Some(text) = frequency else {
            return Cadence::Other;
        };
        let text = text.to_lowercase();
        if text.contains("daily") {
            Cadence::Daily
        } else if text.contains("profile") {
            Cadence::ProfileBased
        } else {
            Cadence::Other
        }
    }

    pub fn is_daily(&self) -> bool {
        matches!(self, Cadence::Daily)
    }
}

/// A configured, potentially live, automated messaging campaign.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flow {
    pub id: String,
    pub name: String,
    pub product_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub product_name: String,
    pub trigger: TriggerKind,

    /// Free-text frequency descriptor, e.g. "Daily at 9am".
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub frequency: Option<String>,

    /// Delivery channels. Must be non-empty for a valid flow.
    pub channels: BTreeSet<Channel>,

    /// Priority on a 0-100 scale. `None` means undeclared.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub priority: Option<u8>,

    /// Descriptor of the logic that prevents over-messaging a user.
    /// Its absence is a risk signal.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub suppression_rules: Option<String>,
}

impl Flow {
    /// Create a builder for a flow.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> FlowBuilder {
        FlowBuilder::new(id, name)
    }

    /// The parsed sending cadence.
    pub fn cadence(&self) -> Cadence {
        Cadence::parse(self.frequency.as_deref())
    }

    /// Declared priority, or [`DEFAULT_PRIORITY`] when absent.
    pub fn effective_priority(&self) -> u8 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    /// Channels this flow shares with another, in channel order.
    pub fn shared_channels(&self, other: &Flow) -> Vec<Channel> {
        self.channels.intersection(&other.channels).copied().collect()
    }
}

/// Builder for `Flow`.
#[derive(Debug)]
pub struct FlowBuilder {
    flow: Flow,
}

impl FlowBuilder {
    /// Create a new builder. Defaults to a scheduled flow with no channels.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            flow: Flow {
                id: id.into(),
                name: name.into(),
                product_id: String::new(),
                product_name: String::new(),
                trigger: TriggerKind::Scheduled,
                frequency: None,
                channels: BTreeSet::new(),
                priority: None,
                suppression_rules: None,
            },
        }
    }

    /// Set the owning product.
    pub fn product(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.flow.product_id = id.into();
        self.flow.product_name = name.into();
        self
    }

    pub fn trigger(mut self, trigger: TriggerKind) -> Self {
        self.flow.trigger = trigger;
        self
    }

    pub fn frequency(mut self, frequency: impl Into<String>) -> Self {
        self.flow.frequency = Some(frequency.into());
        self
    }

    /// Add a delivery channel.
    pub fn channel(mut self, channel: Channel) -> Self {
        self.flow.channels.insert(channel);
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.flow.priority = Some(priority);
        self
    }

    pub fn suppression_rules(mut self, rules: impl Into<String>) -> Self {
        self.flow.suppression_rules = Some(rules.into());
        self
    }

    /// Build the flow.
    pub fn build(self) -> Flow {
        self.flow
    }
}
