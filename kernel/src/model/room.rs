use serde::{Deserialize, Serialize};

/// Room-type identity as it appears in queries and stored selections.
/// Legacy records hold the bare number (`"2"`), newer ones the slug (`"room2"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomTypeId(String);

impl RoomTypeId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id with its non-numeric prefix stripped: `"room2"` -> `"2"`.
    pub fn numeric(&self) -> &str {
        self.0.trim_start_matches(|c: char| !c.is_ascii_digit())
    }

    pub fn matches(&self, selected_id: &str) -> bool {
        let selected_id = selected_id.trim();
        if selected_id == self.0 {
            return true;
        }
        let numeric = self.numeric();
        !numeric.is_empty() && selected_id == numeric
    }
}

impl std::fmt::Display for RoomTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    pub id: &'static str,
    pub title: &'static str,
    /// Nightly rate in whole euros.
    pub price: u32,
    pub min_adults: u32,
    pub max_adults: u32,
    pub max_children: u32,
    pub one_adult_requires_child: bool,
    pub ac: bool,
}

pub const ROOM_TYPES: [RoomType; 6] = [
    RoomType {
        id: "room1",
        title: "Double Room with Sea View",
        price: 70,
        min_adults: 1,
        max_adults: 2,
        max_children: 1,
        one_adult_requires_child: false,
        ac: true,
    },
    RoomType {
        id: "room2",
        title: "Twin Room",
        price: 60,
        min_adults: 1,
        max_adults: 2,
        max_children: 1,
        one_adult_requires_child: false,
        ac: true,
    },
    RoomType {
        id: "room3",
        title: "Triple Room",
        price: 80,
        min_adults: 2,
        max_adults: 3,
        max_children: 1,
        one_adult_requires_child: false,
        ac: true,
    },
    RoomType {
        id: "room4",
        title: "Family Room",
        price: 95,
        min_adults: 2,
        max_adults: 4,
        max_children: 2,
        one_adult_requires_child: false,
        ac: true,
    },
    RoomType {
        id: "room5",
        title: "Economy Double Room",
        price: 50,
        min_adults: 1,
        max_adults: 2,
        max_children: 0,
        one_adult_requires_child: false,
        ac: false,
    },
    RoomType {
        id: "room6",
        title: "Single Room",
        price: 40,
        min_adults: 1,
        max_adults: 1,
        max_children: 1,
        one_adult_requires_child: true,
        ac: false,
    },
];

impl RoomType {
    pub fn room_type_id(&self) -> RoomTypeId {
        RoomTypeId::new(self.id)
    }

    /// Occupancy rules shown to guests. None of these block a booking.
    pub fn advisories(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.min_adults > 1 {
            notes.push(format!("Intended for at least {} adults.", self.min_adults));
        }
        if self.one_adult_requires_child {
            notes.push("A single adult should travel with a child in this room.".to_string());
        }
        if self.max_children == 0 {
            notes.push("Not suited for children.".to_string());
        }
        notes
    }
}

pub fn all_room_types() -> &'static [RoomType] {
    &ROOM_TYPES
}

/// Looks a room type up by slug (`room3`) or bare number (`3`).
pub fn find_room_type(slug: &str) -> Option<&'static RoomType> {
    let wanted = RoomTypeId::new(slug);
    ROOM_TYPES.iter().find(|room| {
        let id = room.room_type_id();
        id == wanted || (wanted.as_str() == id.numeric() && !wanted.as_str().is_empty())
    })
}
