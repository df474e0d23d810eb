use serde::Serialize;

/// Stable handle to a waypoint; survives reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaypointId(u32);

/// Role derived from position: first is Start, last is End.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointKind {
    Start,
    Stop,
    End,
}

impl WaypointKind {
    pub fn at(position: usize, len: usize) -> Self {
        if position == 0 {
            WaypointKind::Start
        } else if position + 1 >= len {
            WaypointKind::End
        } else {
            WaypointKind::Stop
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waypoint {
    pub id: WaypointId,
    pub text: String,
}

/// Start, any number of stops, End. Never fewer than two entries.
#[derive(Debug, Clone)]
pub struct WaypointSequence {
    entries: Vec<Waypoint>,
    next_id: u32,
}

impl Default for WaypointSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointSequence {
    pub fn new() -> Self {
        let mut sequence = Self {
            entries: Vec::with_capacity(2),
            next_id: 0,
        };
        for _ in 0..2 {
            let id = sequence.fresh_id();
            sequence.entries.push(Waypoint {
                id,
                text: String::new(),
            });
        }
        sequence
    }

    fn fresh_id(&mut self) -> WaypointId {
        let id = WaypointId(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: WaypointId) -> Option<usize> {
        self.entries.iter().position(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Waypoint] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<WaypointId> {
        self.entries.iter().map(|w| w.id).collect()
    }

    pub fn contains(&self, id: WaypointId) -> bool {
        self.position(id).is_some()
    }

    pub fn start(&self) -> WaypointId {
        self.entries[0].id
    }

    pub fn end(&self) -> WaypointId {
        self.entries[self.entries.len() - 1].id
    }

    /// Inserts a stop just before the destination.
    pub fn add(&mut self, label: &str) -> WaypointId {
        let id = self.fresh_id();
        let before_end = self.entries.len() - 1;
        self.entries.insert(
            before_end,
            Waypoint {
                id,
                text: label.to_string(),
            },
        );
        id
    }

    pub fn move_up(&mut self, id: WaypointId) -> bool {
        match self.position(id) {
            Some(pos) if pos > 0 => {
                self.entries.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }

    pub fn move_down(&mut self, id: WaypointId) -> bool {
        match self.position(id) {
            Some(pos) if pos + 1 < self.entries.len() => {
                self.entries.swap(pos, pos + 1);
                true
            }
            _ => false,
        }
    }

    /// Refuses to go below Start + End.
    pub fn remove(&mut self, id: WaypointId) -> bool {
        if self.entries.len() <= 2 {
            return false;
        }
        match self.position(id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn set_text(&mut self, id: WaypointId, text: &str) -> bool {
        match self.entries.iter_mut().find(|w| w.id == id) {
            Some(waypoint) => {
                waypoint.text = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_start_text(&mut self, text: &str) {
        self.entries[0].text = text.to_string();
    }

    pub fn text(&self, id: WaypointId) -> Option<&str> {
        self.entries
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.text.as_str())
    }

    pub fn kind(&self, id: WaypointId) -> Option<WaypointKind> {
        self.position(id)
            .map(|pos| WaypointKind::at(pos, self.entries.len()))
    }

    pub fn placeholder(&self, id: WaypointId) -> Option<String> {
        let pos = self.position(id)?;
        Some(match WaypointKind::at(pos, self.entries.len()) {
            WaypointKind::Start => "Start Location (or My Location)...".to_string(),
            WaypointKind::End => "Destination...".to_string(),
            WaypointKind::Stop => format!("Stop {}...", pos),
        })
    }

    pub fn can_move_up(&self, id: WaypointId) -> bool {
        matches!(self.position(id), Some(pos) if pos > 0)
    }

    pub fn can_move_down(&self, id: WaypointId) -> bool {
        matches!(self.position(id), Some(pos) if pos + 1 < self.entries.len())
    }

    pub fn can_remove(&self) -> bool {
        self.entries.len() > 2
    }

    /// Trimmed, non-empty texts in order; exactly what gets planned.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|w| w.text.trim())
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .collect()
    }
}
