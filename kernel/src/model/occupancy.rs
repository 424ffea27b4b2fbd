use serde::Serialize;

use crate::model::room::RoomType;

/// Most rooms of one type a single booking may ask for.
pub const MAX_ROOMS_PER_TYPE: u32 = 20;

#[derive(Debug, Clone, Copy)]
pub struct RoomSelection {
    pub room: &'static RoomType,
    pub qty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupancyCheck {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl OccupancyCheck {
    fn pass() -> Self {
        Self { ok: true, reason: None }
    }

    fn fail(reason: String) -> Self {
        Self {
            ok: false,
            reason: Some(reason),
        }
    }
}

/// Checks guest counts against the maximum capacity of the selection.
/// Minimum occupancy and the one-adult-with-child rule are advisory only.
pub fn validate(selections: &[RoomSelection], adults: u32, children: u32) -> OccupancyCheck {
    let selections: Vec<&RoomSelection> = selections.iter().filter(|s| s.qty > 0).collect();
    if let Some(s) = selections.iter().find(|s| s.qty > MAX_ROOMS_PER_TYPE) {
        return OccupancyCheck::fail(format!(
            "At most {MAX_ROOMS_PER_TYPE} rooms of type {} can be booked at once.",
            s.room.title
        ));
    }

    match selections.as_slice() {
        [] => OccupancyCheck::fail("Please select at least one room.".to_string()),
        [single] if single.qty == 1 => {
            let room = single.room;
            if adults > room.max_adults {
                OccupancyCheck::fail(format!(
                    "{} allows at most {} adults.",
                    room.title, room.max_adults
                ))
            } else if children > room.max_children {
                OccupancyCheck::fail(format!(
                    "{} allows at most {} children.",
                    room.title, room.max_children
                ))
            } else {
                OccupancyCheck::pass()
            }
        }
        many => {
            let max_adults = combined(many, |room| room.max_adults);
            let max_children = combined(many, |room| room.max_children);
            if adults > max_adults {
                OccupancyCheck::fail(format!(
                    "The selected rooms hold at most {max_adults} adults in total."
                ))
            } else if children > max_children {
                OccupancyCheck::fail(format!(
                    "The selected rooms hold at most {max_children} children in total."
                ))
            } else {
                OccupancyCheck::pass()
            }
        }
    }
}

fn combined(selections: &[&RoomSelection], per_room: impl Fn(&RoomType) -> u32) -> u32 {
    selections.iter().fold(0u32, |total, s| {
        total.saturating_add(per_room(s.room).saturating_mul(s.qty))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::room::find_room_type;

    fn pick(slug: &str, qty: u32) -> RoomSelection {
        RoomSelection {
            room: find_room_type(slug).unwrap(),
            qty,
        }
    }

    #[test]
    fn single_room_limits() {
        // room1: two adults, one child
        let one = [pick("room1", 1)];
        assert!(validate(&one, 2, 1).ok);

        let too_many = validate(&one, 3, 1);
        assert!(!too_many.ok);
        assert!(too_many.reason.unwrap().contains("2 adults"));

        assert!(!validate(&one, 2, 2).ok);
    }

    #[test]
    fn multi_room_capacity_is_combined() {
        let rooms = [pick("room1", 1), pick("room4", 1)];
        assert!(validate(&rooms, 6, 3).ok);
        assert!(!validate(&rooms, 7, 0).ok);
        assert!(!validate(&rooms, 2, 4).ok);

        let doubled = [pick("room5", 2)];
        assert!(validate(&doubled, 4, 0).ok);
        assert!(!validate(&doubled, 4, 1).ok);
    }

    #[test]
    fn minimums_are_not_enforced() {
        // room4 asks for two adults and room6 for a child with a lone adult;
        // neither blocks.
        assert!(validate(&[pick("room4", 1)], 1, 0).ok);
        assert!(validate(&[pick("room6", 1)], 1, 0).ok);
    }

    #[test]
    fn oversized_quantities_are_refused() {
        let check = validate(&[pick("room1", u32::MAX)], 2, 0);
        assert!(!check.ok);
        assert!(check.reason.unwrap().contains("At most 20 rooms"));

        let check = validate(&[pick("room4", 1 << 30), pick("room1", 1)], 2, 0);
        assert!(!check.ok);

        let at_limit = [pick("room4", MAX_ROOMS_PER_TYPE), pick("room1", MAX_ROOMS_PER_TYPE)];
        assert!(validate(&at_limit, 120, 60).ok);
        assert_eq!(combined(&at_limit.iter().collect::<Vec<_>>(), |r| r.max_adults), 120);
    }

    #[test]
    fn empty_selection_fails() {
        assert!(!validate(&[], 1, 0).ok);
        assert!(!validate(&[pick("room1", 0)], 1, 0).ok);
    }
}
