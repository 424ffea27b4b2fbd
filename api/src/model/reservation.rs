use garde::Validate;
use kernel::{
    model::{
        id::ReservationId,
        reservation::{
            event::{ReservationCandidate, RoomRequest},
            Guest,
        },
    },
    service::booking::CommittedReservation,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub check_in: Option<String>,
    #[garde(skip)]
    pub check_out: Option<String>,
    #[garde(range(min = 1))]
    pub adults: u32,
    #[garde(skip)]
    #[serde(default)]
    pub children: u32,
    #[garde(dive)]
    #[serde(default)]
    pub rooms: Vec<RoomRequestBody>,
    #[garde(dive)]
    pub guest: GuestRequest,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequestBody {
    #[garde(skip)]
    #[serde(alias = "id")]
    pub room_type: String,
    #[garde(range(max = 20))]
    #[serde(default = "default_qty")]
    pub qty: u32,
}

fn default_qty() -> u32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GuestRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(skip)]
    pub phone: Option<String>,
    #[garde(skip)]
    pub notes: Option<String>,
}

impl From<CreateReservationRequest> for ReservationCandidate {
    fn from(value: CreateReservationRequest) -> Self {
        let CreateReservationRequest {
            check_in,
            check_out,
            adults,
            children,
            rooms,
            guest,
        } = value;
        let GuestRequest {
            name,
            email,
            phone,
            notes,
        } = guest;
        ReservationCandidate::new(
            check_in,
            check_out,
            adults,
            children,
            rooms
                .into_iter()
                .map(|r| RoomRequest::new(r.room_type, r.qty))
                .collect(),
            Guest {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                phone,
                notes,
            },
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationResponse {
    pub ok: bool,
    pub id: ReservationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<CommittedReservation> for CreateReservationResponse {
    fn from(value: CommittedReservation) -> Self {
        Self {
            ok: true,
            id: value.reservation.id,
            warning: value.warning,
        }
    }
}
