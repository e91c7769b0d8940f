//! # Response DTOs
//!
//! What API consumers receive for pool items and assignments.
//!
//! Money leaves the system here: integer cents become two-place decimals
//! (`unitPrice: 10.0`, `total: 6.67`).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use fleet_core::{AssignmentDetail, PoolItem};

use crate::allocation::{AssignOutcome, BulkArchiveReport, ModifyOutcome};
use crate::response::ApiResponse;

/// Pool item DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PoolItemDto {
    pub id: String,
    pub name: String,
    pub note: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub select_unit: String,
    pub unit_size: i64,
    pub total: f64,
    pub date_created: String,
    pub last_updated: Option<String>,
}

impl From<PoolItem> for PoolItemDto {
    fn from(item: PoolItem) -> Self {
        PoolItemDto {
            unit_price: item.unit_price().as_decimal(),
            total: item.total().as_decimal(),
            date_created: item.date_created.to_rfc3339(),
            last_updated: item.last_updated.map(|ts| ts.to_rfc3339()),
            id: item.id,
            name: item.name,
            note: item.note,
            quantity: item.quantity,
            select_unit: item.select_unit,
            unit_size: item.unit_size,
        }
    }
}

/// Assignment DTO, with destination names when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AssignmentDto {
    pub id: String,
    pub name: String,
    pub note: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub select_unit: String,
    pub unit_size: i64,
    pub total: f64,
    pub fleet_id: String,
    pub boat_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fleet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boat: Option<String>,
    pub out_date: String,
    pub last_updated: Option<String>,
    pub archived: bool,
}

impl From<fleet_core::Assignment> for AssignmentDto {
    fn from(a: fleet_core::Assignment) -> Self {
        AssignmentDto {
            unit_price: a.unit_price().as_decimal(),
            total: a.total().as_decimal(),
            out_date: a.out_date.to_rfc3339(),
            last_updated: a.last_updated.map(|ts| ts.to_rfc3339()),
            id: a.id,
            name: a.name,
            note: a.note,
            quantity: a.quantity,
            select_unit: a.select_unit,
            unit_size: a.unit_size,
            fleet_id: a.fleet_id,
            boat_id: a.boat_id,
            fleet: None,
            boat: None,
            archived: a.archived,
        }
    }
}

impl From<AssignmentDetail> for AssignmentDto {
    fn from(detail: AssignmentDetail) -> Self {
        let mut dto = AssignmentDto::from(detail.assignment);
        dto.fleet = Some(detail.fleet_name);
        dto.boat = Some(detail.boat_name);
        dto
    }
}

/// Result of a re-balance.
///
/// `assignment` is absent when the row was released.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ModifyResultDto {
    pub assignment: Option<AssignmentDto>,
    pub pool_item: Option<PoolItemDto>,
    pub returned_quantity: i64,
}

impl From<ModifyOutcome> for ModifyResultDto {
    fn from(outcome: ModifyOutcome) -> Self {
        match outcome {
            ModifyOutcome::Updated {
                assignment,
                pool_item,
            } => ModifyResultDto {
                assignment: Some(assignment.into()),
                pool_item: pool_item.map(PoolItemDto::from),
                returned_quantity: 0,
            },
            ModifyOutcome::Released {
                returned, pool_item, ..
            } => ModifyResultDto {
                assignment: None,
                pool_item: Some(pool_item.into()),
                returned_quantity: returned,
            },
        }
    }
}

impl From<AssignOutcome> for AssignmentDto {
    fn from(outcome: AssignOutcome) -> Self {
        outcome.into_assignment().into()
    }
}

/// Per-id outcome of a bulk archive update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BulkArchiveDto {
    pub updated: Vec<String>,
    pub failed: Vec<ArchiveFailureDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ArchiveFailureDto {
    pub id: String,
    pub error: String,
}

impl From<BulkArchiveReport> for BulkArchiveDto {
    fn from(report: BulkArchiveReport) -> Self {
        BulkArchiveDto {
            updated: report.updated,
            failed: report
                .failed
                .into_iter()
                .map(|(id, err)| ArchiveFailureDto {
                    id,
                    error: err.to_string(),
                })
                .collect(),
        }
    }
}

/// A report with failed rows becomes a partial response: `success` is
/// false, the per-id results still ride in `data`.
impl From<BulkArchiveReport> for ApiResponse<BulkArchiveDto> {
    fn from(report: BulkArchiveReport) -> Self {
        let message = report.message();
        if report.is_complete() {
            ApiResponse::ok(message, report.into())
        } else {
            ApiResponse::partial(message, report.into())
        }
    }
}
