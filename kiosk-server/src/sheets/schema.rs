//! Typed row mapping
//!
//! Column positions are resolved once from the header rows (by configured
//! header name) and validated at startup. Everything downstream works with
//! [`Registration`] and [`OrderEvent`] instead of raw cell vectors.

use chrono_tz::Tz;

use super::{SheetStore, StoreError, StoreResult, Table};
use crate::eligibility::{OrderEvent, Registration, parse_order_timestamp};

/// Header names of the registration table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationColumnNames {
    pub student_id: String,
    pub name: String,
    pub phone: String,
    pub subscription_option: String,
    pub consent: String,
    pub payment: String,
    /// Optional; the form-submission timestamp column
    pub registered_at: String,
}

impl Default for RegistrationColumnNames {
    fn default() -> Self {
        Self {
            student_id: "학번 (연세대학교 학부생만 가능합니다)".into(),
            name: "이름".into(),
            phone: "전화번호".into(),
            subscription_option: "구독제 옵션 선택".into(),
            consent: "개인정보 수집 및 이용 동의".into(),
            payment: "결제 여부".into(),
            registered_at: "타임스탬프".into(),
        }
    }
}

/// Header names of the orders table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderColumnNames {
    pub student_id: String,
    pub beverage: String,
    pub timestamp: String,
}

impl Default for OrderColumnNames {
    fn default() -> Self {
        Self {
            student_id: "학번".into(),
            beverage: "메뉴".into(),
            timestamp: "주문 시각".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationColumns {
    pub student_id: usize,
    pub name: usize,
    pub phone: usize,
    pub subscription_option: usize,
    pub consent: usize,
    pub payment: usize,
    pub registered_at: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderColumns {
    pub student_id: usize,
    pub beverage: usize,
    pub timestamp: usize,
}

impl OrderColumns {
    /// Width of an appended order row
    pub fn width(&self) -> usize {
        self.student_id.max(self.beverage).max(self.timestamp) + 1
    }
}

/// Resolved column layout of both tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSchema {
    pub registrations: RegistrationColumns,
    pub orders: OrderColumns,
}

impl SheetSchema {
    /// Fetch both header rows and resolve the configured columns.
    pub async fn load(
        store: &dyn SheetStore,
        registration_names: &RegistrationColumnNames,
        order_names: &OrderColumnNames,
    ) -> StoreResult<Self> {
        let registrations = store.fetch_rows(Table::Registrations).await?;
        let orders = store.fetch_rows(Table::Orders).await?;

        let registration_header = registrations
            .first()
            .ok_or(StoreError::MissingHeader(Table::Registrations))?;
        let order_header = orders
            .first()
            .ok_or(StoreError::MissingHeader(Table::Orders))?;

        Self::resolve(registration_names, registration_header, order_names, order_header)
    }

    pub fn resolve(
        registration_names: &RegistrationColumnNames,
        registration_header: &[String],
        order_names: &OrderColumnNames,
        order_header: &[String],
    ) -> StoreResult<Self> {
        let reg = |name: &str| find_column(Table::Registrations, registration_header, name);
        let ord = |name: &str| find_column(Table::Orders, order_header, name);

        Ok(Self {
            registrations: RegistrationColumns {
                student_id: reg(&registration_names.student_id)?,
                name: reg(&registration_names.name)?,
                phone: reg(&registration_names.phone)?,
                subscription_option: reg(&registration_names.subscription_option)?,
                consent: reg(&registration_names.consent)?,
                payment: reg(&registration_names.payment)?,
                registered_at: reg(&registration_names.registered_at).ok(),
            },
            orders: OrderColumns {
                student_id: ord(&order_names.student_id)?,
                beverage: ord(&order_names.beverage)?,
                timestamp: ord(&order_names.timestamp)?,
            },
        })
    }

    /// First registration row whose student ID matches
    pub fn find_registration(
        &self,
        rows: &[Vec<String>],
        student_id: &str,
        paid_marker: &str,
    ) -> Option<Registration> {
        let cols = &self.registrations;
        rows.iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| cell(row, cols.student_id) == student_id)
            .map(|(row_index, row)| Registration {
                row_index,
                student_id: cell(row, cols.student_id).to_string(),
                name: cell(row, cols.name).to_string(),
                phone: cell(row, cols.phone).to_string(),
                subscription_option: cell(row, cols.subscription_option).to_string(),
                consent: cell(row, cols.consent).to_string(),
                registered_at: cols
                    .registered_at
                    .map(|i| cell(row, i).to_string())
                    .filter(|s| !s.is_empty()),
                paid: cell(row, cols.payment) == paid_marker,
            })
    }

    /// Order rows for `student_id`, with timestamps parsed in `tz`.
    ///
    /// Unparsable timestamps are kept with `placed_at: None`.
    pub fn order_events(&self, rows: &[Vec<String>], student_id: &str, tz: Tz) -> Vec<OrderEvent> {
        let cols = &self.orders;
        rows.iter()
            .skip(1)
            .filter(|row| cell(row, cols.student_id) == student_id)
            .map(|row| {
                let raw = cell(row, cols.timestamp);
                let placed_at = match parse_order_timestamp(raw, tz) {
                    Ok(at) => Some(at),
                    Err(e) => {
                        tracing::warn!(student_id = %student_id, error = %e, "Skipping order row with unusable timestamp");
                        None
                    }
                };
                OrderEvent {
                    student_id: student_id.to_string(),
                    beverage: cell(row, cols.beverage).to_string(),
                    raw_timestamp: raw.to_string(),
                    placed_at,
                }
            })
            .collect()
    }

    /// Fixed-width order row with each value in its resolved column
    pub fn order_row(&self, student_id: &str, beverage: &str, timestamp: &str) -> Vec<String> {
        let cols = &self.orders;
        let mut row = vec![String::new(); cols.width()];
        row[cols.student_id] = student_id.to_string();
        row[cols.beverage] = beverage.to_string();
        row[cols.timestamp] = timestamp.to_string();
        row
    }
}

fn find_column(table: Table, header: &[String], name: &str) -> StoreResult<usize> {
    let wanted = name.trim();
    header
        .iter()
        .position(|h| h.trim() == wanted)
        .ok_or_else(|| StoreError::MissingColumn {
            table,
            column: name.to_string(),
        })
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|s| s.trim()).unwrap_or("")
}
