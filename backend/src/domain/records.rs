//! Helpers shared by the record services.

use anyhow::Result;
use shared::{DeleteRecordsRequest, DeleteRecordsResponse};
use tracing::info;

use crate::storage::{Entity, EntityStorage};

/// Delete the requested records and report which ids were unknown
pub async fn delete_records<T, R>(
    repository: &R,
    request: DeleteRecordsRequest,
    singular: &str,
    plural: &str,
) -> Result<DeleteRecordsResponse>
where
    T: Entity,
    R: EntityStorage<T>,
{
    let deleted = repository.delete_many(&request.ids).await?;
    let not_found_ids: Vec<String> = request
        .ids
        .into_iter()
        .filter(|id| !deleted.contains(id))
        .collect();

    let success_message = match deleted.len() {
        0 => format!("No {} were deleted", plural),
        1 => format!("1 {} deleted successfully", singular),
        n => format!("{} {} deleted successfully", n, plural),
    };
    info!("{} ({} not found)", success_message, not_found_ids.len());

    Ok(DeleteRecordsResponse {
        deleted_count: deleted.len(),
        success_message,
        not_found_ids,
    })
}

/// Round to whole cents for totals built from floating point sums
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
