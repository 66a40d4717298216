use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct SessionChangedEvent {
    pub uid: Option<Uuid>,
    pub signed_in: bool,
    pub changed_at: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingRecordedEvent {
    pub booking_id: Uuid,
    pub user_id: Uuid,
    pub total_cents: i64,
    pub item_count: u32,
    pub recorded_at: i64,
}
