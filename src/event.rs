//! 模拟事件记录器。
//! The simulation event recorder.
//!
//! An append-only, ordered log of what happened each round. Records are never
//! mutated after creation; displays truncate the view, never the log.

use std::fmt;

/// The kind of a recorded event.
///
/// 记录事件的类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PacketLoss,
    SlowStartReset,
    CongestionAvoidanceReset,
    FastRetransmit,
    FastRecovery,
    PhaseChange,
    RecoveryComplete,
    AckReceived,
}

/// The display token a consumer renders an event with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventColor {
    Error,
    Warning,
    Info,
    Chart1,
    Success,
}

impl EventKind {
    /// The human-readable tag of the event.
    pub fn tag(self) -> &'static str {
        match self {
            EventKind::PacketLoss => "Packet Loss",
            EventKind::SlowStartReset => "Slow Start Reset",
            EventKind::CongestionAvoidanceReset => "Congestion Avoidance Reset",
            EventKind::FastRetransmit => "Fast Retransmit",
            EventKind::FastRecovery => "Fast Recovery",
            EventKind::PhaseChange => "Phase Change",
            EventKind::RecoveryComplete => "Recovery Complete",
            EventKind::AckReceived => "ACK Received",
        }
    }

    /// The color an event of this kind is displayed with.
    pub fn color(self) -> EventColor {
        match self {
            EventKind::PacketLoss => EventColor::Error,
            EventKind::SlowStartReset
            | EventKind::CongestionAvoidanceReset
            | EventKind::FastRecovery => EventColor::Warning,
            EventKind::FastRetransmit => EventColor::Info,
            EventKind::PhaseChange | EventKind::RecoveryComplete => EventColor::Chart1,
            EventKind::AckReceived => EventColor::Success,
        }
    }
}

impl EventColor {
    /// The CSS-style token the presentation layer resolves.
    pub fn token(self) -> &'static str {
        match self {
            EventColor::Error => "var(--color-error)",
            EventColor::Warning => "var(--color-warning)",
            EventColor::Info => "var(--color-info)",
            EventColor::Chart1 => "var(--color-chart-1)",
            EventColor::Success => "var(--color-success)",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An immutable, time-stamped record of something that happened in a round.
///
/// 不可变的、带时间戳的回合事件记录。
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationEvent {
    /// The round index active when the event was recorded.
    pub time: u64,
    pub kind: EventKind,
    pub description: String,
    pub color: EventColor,
}

impl fmt::Display for SimulationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[t={}] {}: {}", self.time, self.kind, self.description)
    }
}

/// Append-only ordered event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SimulationEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends exactly one record stamped with `time`.
    ///
    /// 追加一条带有 `time` 时间戳的记录。
    pub fn record(&mut self, time: u64, kind: EventKind, description: impl Into<String>) {
        self.events.push(SimulationEvent {
            time,
            kind,
            description: description.into(),
            color: kind.color(),
        });
    }

    /// Appends already-built records, keeping their order.
    pub fn extend(&mut self, events: impl IntoIterator<Item = SimulationEvent>) {
        self.events.extend(events);
    }

    pub fn events(&self) -> &[SimulationEvent] {
        &self.events
    }

    /// Consumes the log, returning its records in order.
    pub fn into_events(self) -> Vec<SimulationEvent> {
        self.events
    }

    /// The last `limit` events, oldest first.
    pub fn recent(&self, limit: usize) -> &[SimulationEvent] {
        let start = self.events.len().saturating_sub(limit);
        &self.events[start..]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
