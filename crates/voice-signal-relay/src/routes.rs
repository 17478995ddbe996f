//! Destination routing: the table binding inbound destinations to relay
//! operations, and the outbound topic names clients subscribe to.

use std::collections::HashMap;
use std::fmt;

/// Prefix shared by every outbound topic.
pub const TOPIC_PREFIX: &str = "/topic";

pub const USER_CONNECTED_TOPIC: &str = "/topic/user/connected";
pub const USER_DISCONNECTED_TOPIC: &str = "/topic/user/disconnected";

/// The three room-scoped negotiation message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    pub const ALL: [SignalKind; 3] = [SignalKind::Offer, SignalKind::IceCandidate, SignalKind::Answer];

    /// Name used in destination paths.
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "iceCandidate",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `(voiceKey, roomId)` pair scoping one call. Never validated; any
/// pair of strings, empty ones included, names a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomAddress {
    pub voice_key: String,
    pub room_id: String,
}

impl RoomAddress {
    pub fn new(voice_key: impl Into<String>, room_id: impl Into<String>) -> Self {
        Self {
            voice_key: voice_key.into(),
            room_id: room_id.into(),
        }
    }
}

/// The relay operation a destination is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Signal(SignalKind),
    CallKey,
    SendKey,
}

/// A destination matched against the table, with its variables bound and
/// its outbound topic rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub route: Route,
    /// Set for room-scoped routes only.
    pub room: Option<RoomAddress>,
    pub topic: String,
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A destination pattern such as `/peer/offer/{voiceKey}/{roomId}`.
///
/// Variables match exactly one path segment, which may be empty.
#[derive(Debug, Clone)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
}

/// Variables captured by a template match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(HashMap<String, String>);

impl RouteParams {
    /// Bind the `voiceKey` and `roomId` variables.
    pub fn for_room(room: &RoomAddress) -> Self {
        let mut params = HashMap::new();
        params.insert("voiceKey".to_string(), room.voice_key.clone());
        params.insert("roomId".to_string(), room.room_id.clone());
        Self(params)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    fn room(&self) -> RoomAddress {
        RoomAddress::new(
            self.get("voiceKey").unwrap_or_default(),
            self.get("roomId").unwrap_or_default(),
        )
    }
}

impl RouteTemplate {
    pub fn parse(template: &str) -> Self {
        let segments = template
            .split('/')
            .map(|seg| match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Variable(name.to_string()),
                None => Segment::Literal(seg.to_string()),
            })
            .collect();
        Self {
            raw: template.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match `destination` segment by segment.
    pub fn matches(&self, destination: &str) -> Option<RouteParams> {
        let parts: Vec<&str> = destination.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Variable(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(RouteParams(params))
    }

    /// Render the template. Unbound variables render as empty segments.
    pub fn expand(&self, params: &RouteParams) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(lit) => lit.as_str(),
                Segment::Variable(name) => params.get(name).unwrap_or_default(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

// ---------------------------------------------------------------------------
// Route table
// ---------------------------------------------------------------------------

struct RouteEntry {
    route: Route,
    inbound: RouteTemplate,
    outbound: RouteTemplate,
}

impl RouteEntry {
    /// Outbound template is the inbound one under [`TOPIC_PREFIX`].
    fn new(route: Route, inbound: &str) -> Self {
        Self {
            route,
            inbound: RouteTemplate::parse(inbound),
            outbound: RouteTemplate::parse(&format!("{TOPIC_PREFIX}{inbound}")),
        }
    }

    fn room_scoped(&self) -> bool {
        matches!(self.route, Route::Signal(_))
    }
}

/// Inbound destination table, built once at startup.
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// The five relay routes: one per signal kind plus the two key routes.
    pub fn standard() -> Self {
        let mut entries: Vec<RouteEntry> = SignalKind::ALL
            .iter()
            .map(|&kind| {
                RouteEntry::new(
                    Route::Signal(kind),
                    &format!("/peer/{}/{{voiceKey}}/{{roomId}}", kind.as_str()),
                )
            })
            .collect();
        entries.push(RouteEntry::new(Route::CallKey, "/call/key"));
        entries.push(RouteEntry::new(Route::SendKey, "/send/key"));
        Self { entries }
    }

    /// `(inbound, outbound, route)` in table order.
    pub fn templates(&self) -> impl Iterator<Item = (&str, &str, Route)> {
        self.entries
            .iter()
            .map(|e| (e.inbound.as_str(), e.outbound.as_str(), e.route))
    }

    pub fn resolve(&self, destination: &str) -> Option<ResolvedRoute> {
        self.entries.iter().find_map(|entry| {
            let params = entry.inbound.matches(destination)?;
            Some(ResolvedRoute {
                route: entry.route,
                room: entry.room_scoped().then(|| params.room()),
                topic: entry.outbound.expand(&params),
            })
        })
    }

    /// Outbound topic of `route`, with `room` bound for room-scoped routes.
    pub fn outbound_topic(&self, route: Route, room: Option<&RoomAddress>) -> Option<String> {
        let entry = self.entries.iter().find(|e| e.route == route)?;
        let params = room.map(RouteParams::for_room).unwrap_or_default();
        Some(entry.outbound.expand(&params))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
