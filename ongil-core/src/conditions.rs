//! Store-conditions form: the rows a founder fills in before requesting an analysis.
//!
//! Two rows are ranges edited through the range sheet, four are single choices.
//! Choice keys are the exact strings the analysis API understands.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{AnalysisRequest, MinMax};
use crate::numeric::format_amount;
use crate::range::{format_range, Domain, Range, RangePair};
use crate::sheet::{ChoiceItem, ChoiceRequest, SheetRequest};

pub const PLACEHOLDER: &str = "Select...";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionsError {
    #[error("'{}' has not been filled in", .0.title())]
    Incomplete(ConditionRow),

    #[error("'{key}' is not a valid option for '{}'", .row.title())]
    UnknownOption { row: ConditionRow, key: String },

    #[error("no location selected (expected \"lat,lng\")")]
    MissingAddress,

    #[error("no business category selected")]
    MissingCategory,

    #[error("invalid coordinates '{0}': expected \"lat,lng\"")]
    InvalidCoordinates(String),
}

/// Rows of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionRow {
    AveragePrice,
    District,
    Operation,
    Rent,
    Size,
    Floor,
}

impl ConditionRow {
    pub const ALL: [ConditionRow; 6] = [
        ConditionRow::AveragePrice,
        ConditionRow::District,
        ConditionRow::Operation,
        ConditionRow::Rent,
        ConditionRow::Size,
        ConditionRow::Floor,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ConditionRow::AveragePrice => "Average menu price",
            ConditionRow::District => "Special district",
            ConditionRow::Operation => "Operation mode",
            ConditionRow::Rent => "Expected monthly rent",
            ConditionRow::Size => "Preferred size",
            ConditionRow::Floor => "Preferred floor",
        }
    }

    pub fn is_range(self) -> bool {
        matches!(self, ConditionRow::AveragePrice | ConditionRow::Rent)
    }
}

/// Won, `0..=50,000` in steps of 100.
pub fn average_price_domain() -> Domain {
    Domain::fixed(0.0, 50_000.0, 100.0)
}

/// Won, `0..=1,500,000` in steps of 10,000.
pub fn rent_domain() -> Domain {
    Domain::fixed(0.0, 1_500_000.0, 10_000.0)
}

pub fn district_options() -> Vec<ChoiceItem> {
    vec![
        ChoiceItem::new("대학가/학교 주변", "University / school area"),
        ChoiceItem::new("공단/회사 단지/산업단지", "Industrial / office complex"),
        ChoiceItem::new("관광지/피서지", "Tourist / resort area"),
        ChoiceItem::new("아파트 단지/주택 밀집 지역", "Apartment / residential area"),
        ChoiceItem::new("해당 사항 없음", "None of these"),
    ]
}

pub fn operation_options() -> Vec<ChoiceItem> {
    vec![
        ChoiceItem::new("홀 운영 위주", "Mostly dine-in"),
        ChoiceItem::new("배달 운영 위주", "Mostly delivery"),
        ChoiceItem::new("모두 겸함", "Both"),
    ]
}

pub fn size_options() -> Vec<ChoiceItem> {
    vec![
        ChoiceItem::new("10평 이하", "Up to 10 pyeong"),
        ChoiceItem::new("11~20평", "11-20 pyeong"),
        ChoiceItem::new("21~30평", "21-30 pyeong"),
        ChoiceItem::new("31~40평", "31-40 pyeong"),
        ChoiceItem::new("41~50평", "41-50 pyeong"),
        ChoiceItem::new("51평 이상", "51 pyeong or more"),
    ]
}

pub fn floor_options() -> Vec<ChoiceItem> {
    vec![
        ChoiceItem::new("지하층", "Basement"),
        ChoiceItem::new("1층", "1st floor"),
        ChoiceItem::new("2층", "2nd floor"),
        ChoiceItem::new("3층", "3rd floor"),
        ChoiceItem::new("4층 이상", "4th floor or higher"),
        ChoiceItem::new("루프탑/옥상", "Rooftop"),
    ]
}

fn size_bounds(key: &str) -> Option<MinMax> {
    let (min, max) = match key {
        "10평 이하" => (0, 10),
        "11~20평" => (11, 20),
        "21~30평" => (21, 30),
        "31~40평" => (31, 40),
        "41~50평" => (41, 50),
        "51평 이상" => (51, 100),
        _ => return None,
    };
    Some(MinMax::new(min, max))
}

fn floor_code(key: &str) -> Option<u8> {
    Some(match key {
        "지하층" => 0,
        "1층" => 1,
        "2층" => 2,
        "3층" => 3,
        "4층 이상" => 4,
        "루프탑/옥상" => 5,
        _ => return None,
    })
}

/// Backend wording for an operation mode.
fn management_method(key: &str) -> Option<&'static str> {
    Some(match key {
        "홀 운영 위주" => "홀 영업 위주",
        "배달 운영 위주" => "배달 영업 위주",
        "모두 겸함" => "홀/배달 겸업",
        _ => return None,
    })
}

/// Won → units of 10,000 won, rounded.
fn to_manwon(won: f64) -> i64 {
    (won / 10_000.0).round() as i64
}

/// Sheet to open for a row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowSheet {
    Range(SheetRequest),
    Choice(ChoiceRequest),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionsForm {
    pub average_price: Range,
    pub rent: Range,
    pub district: Option<String>,
    pub operation: Option<String>,
    pub size: Option<String>,
    pub floor: Option<String>,
}

impl ConditionsForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn choice(&self, row: ConditionRow) -> Option<&String> {
        match row {
            ConditionRow::District => self.district.as_ref(),
            ConditionRow::Operation => self.operation.as_ref(),
            ConditionRow::Size => self.size.as_ref(),
            ConditionRow::Floor => self.floor.as_ref(),
            ConditionRow::AveragePrice | ConditionRow::Rent => None,
        }
    }

    fn choice_mut(&mut self, row: ConditionRow) -> Option<&mut Option<String>> {
        match row {
            ConditionRow::District => Some(&mut self.district),
            ConditionRow::Operation => Some(&mut self.operation),
            ConditionRow::Size => Some(&mut self.size),
            ConditionRow::Floor => Some(&mut self.floor),
            ConditionRow::AveragePrice | ConditionRow::Rent => None,
        }
    }

    fn options(row: ConditionRow) -> Vec<ChoiceItem> {
        match row {
            ConditionRow::District => district_options(),
            ConditionRow::Operation => operation_options(),
            ConditionRow::Size => size_options(),
            ConditionRow::Floor => floor_options(),
            ConditionRow::AveragePrice | ConditionRow::Rent => Vec::new(),
        }
    }

    pub fn is_set(&self, row: ConditionRow) -> bool {
        match row {
            ConditionRow::AveragePrice => self.average_price.is_complete(),
            ConditionRow::Rent => self.rent.is_complete(),
            _ => self.choice(row).is_some(),
        }
    }

    /// Row value as shown to the user.
    pub fn value_text(&self, row: ConditionRow) -> String {
        match row {
            ConditionRow::AveragePrice => format_range(&self.average_price, " won", PLACEHOLDER),
            ConditionRow::Rent => format_range(&self.rent, " won", PLACEHOLDER),
            _ => {
                let Some(key) = self.choice(row) else {
                    return PLACEHOLDER.to_string();
                };
                Self::options(row)
                    .into_iter()
                    .find(|it| &it.key == key)
                    .map_or_else(|| key.clone(), |it| it.label)
            }
        }
    }

    /// Sheet request for a row, seeded with the row's committed value.
    pub fn sheet_for(&self, row: ConditionRow) -> RowSheet {
        match row {
            ConditionRow::AveragePrice => RowSheet::Range(
                SheetRequest::new(row.title(), "won", average_price_domain())
                    .initial(self.average_price),
            ),
            ConditionRow::Rent => RowSheet::Range(
                SheetRequest::new(row.title(), "won", rent_domain()).initial(self.rent),
            ),
            _ => RowSheet::Choice(
                ChoiceRequest::new(row.title(), Self::options(row))
                    .initial(self.choice(row).cloned()),
            ),
        }
    }

    pub fn apply_range(&mut self, row: ConditionRow, pair: RangePair) {
        match row {
            ConditionRow::AveragePrice => self.average_price = pair.into(),
            ConditionRow::Rent => self.rent = pair.into(),
            _ => {}
        }
    }

    pub fn apply_choice(&mut self, row: ConditionRow, key: String) {
        if let Some(slot) = self.choice_mut(row) {
            *slot = Some(key);
        }
    }

    pub fn can_submit(&self) -> bool {
        ConditionRow::ALL.iter().all(|&row| self.is_set(row))
    }

    /// Build the API payload.
    pub fn to_request(&self, addr: &str, category: &str) -> Result<AnalysisRequest, ConditionsError> {
        let addr: String = addr.chars().filter(|c| !c.is_whitespace()).collect();
        if addr.is_empty() {
            return Err(ConditionsError::MissingAddress);
        }
        if category.trim().is_empty() {
            return Err(ConditionsError::MissingCategory);
        }

        let price = self
            .average_price
            .pair()
            .ok_or(ConditionsError::Incomplete(ConditionRow::AveragePrice))?;
        let rent = self.rent.pair().ok_or(ConditionsError::Incomplete(ConditionRow::Rent))?;
        let district = self.required(ConditionRow::District)?;
        let operation = self.required(ConditionRow::Operation)?;
        let size = self.required(ConditionRow::Size)?;
        let floor = self.required(ConditionRow::Floor)?;

        let unknown = |row: ConditionRow, key: &str| ConditionsError::UnknownOption {
            row,
            key: key.to_string(),
        };
        let management = management_method(operation)
            .ok_or_else(|| unknown(ConditionRow::Operation, operation.as_str()))?;
        let size_range = size_bounds(size).ok_or_else(|| unknown(ConditionRow::Size, size.as_str()))?;
        let height = floor_code(floor).ok_or_else(|| unknown(ConditionRow::Floor, floor.as_str()))?;
        if !district_options().iter().any(|it| it.key == *district) {
            return Err(unknown(ConditionRow::District, district.as_str()));
        }

        Ok(AnalysisRequest {
            addr,
            category: category.trim().to_string(),
            marketing_area: district.clone(),
            budget: MinMax::new(to_manwon(rent.low()), to_manwon(rent.high())),
            management_method: management.to_string(),
            representative_menu_name: None,
            representative_menu_price: None,
            average_price: MinMax::new(price.low().round() as i64, price.high().round() as i64),
            size: size_range,
            height: height.to_string(),
        })
    }

    fn required(&self, row: ConditionRow) -> Result<&String, ConditionsError> {
        self.choice(row).ok_or(ConditionsError::Incomplete(row))
    }

    /// One-line summary of the committed ranges, for status lines.
    pub fn summary(&self) -> String {
        let price = self
            .average_price
            .pair()
            .map(|p| format!("{}-{}", format_amount(p.low()), format_amount(p.high())));
        let rent = self
            .rent
            .pair()
            .map(|p| format!("{}-{}", format_amount(p.low()), format_amount(p.high())));
        format!(
            "price {} / rent {}",
            price.as_deref().unwrap_or("-"),
            rent.as_deref().unwrap_or("-")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ConditionsForm {
        let mut form = ConditionsForm::new();
        form.apply_range(ConditionRow::AveragePrice, RangePair::new(6500.0, 9000.0).unwrap());
        form.apply_range(ConditionRow::Rent, RangePair::new(1_000_000.0, 1_500_000.0).unwrap());
        form.apply_choice(ConditionRow::District, "해당 사항 없음".into());
        form.apply_choice(ConditionRow::Operation, "모두 겸함".into());
        form.apply_choice(ConditionRow::Size, "11~20평".into());
        form.apply_choice(ConditionRow::Floor, "루프탑/옥상".into());
        form
    }

    #[test]
    fn submit_requires_every_row() {
        let mut form = filled();
        assert!(form.can_submit());
        form.floor = None;
        assert!(!form.can_submit());
        assert_eq!(
            form.to_request("37.5,127.0", "한식"),
            Err(ConditionsError::Incomplete(ConditionRow::Floor))
        );
    }

    #[test]
    fn request_maps_labels_and_units() {
        let req = filled().to_request(" 37.5665, 126.9780 ", "한식").unwrap();
        assert_eq!(req.addr, "37.5665,126.9780");
        assert_eq!(req.budget, MinMax::new(100, 150));
        assert_eq!(req.average_price, MinMax::new(6500, 9000));
        assert_eq!(req.size, MinMax::new(11, 20));
        assert_eq!(req.height, "5");
        assert_eq!(req.management_method, "홀/배달 겸업");
        assert_eq!(req.marketing_area, "해당 사항 없음");
    }

    #[test]
    fn missing_place_or_category() {
        let form = filled();
        assert_eq!(form.to_request("  ", "한식"), Err(ConditionsError::MissingAddress));
        assert_eq!(form.to_request("1,2", " "), Err(ConditionsError::MissingCategory));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut form = filled();
        form.size = Some("huge".into());
        assert!(matches!(
            form.to_request("1,2", "한식"),
            Err(ConditionsError::UnknownOption { row: ConditionRow::Size, .. })
        ));
    }

    #[test]
    fn value_text_shows_labels_and_ranges() {
        let form = filled();
        assert_eq!(form.value_text(ConditionRow::AveragePrice), "6,500~9,000 won");
        assert_eq!(form.value_text(ConditionRow::Floor), "Rooftop");
        assert_eq!(ConditionsForm::new().value_text(ConditionRow::Size), PLACEHOLDER);
    }

    #[test]
    fn sheet_for_seeds_committed_value() {
        let form = filled();
        match form.sheet_for(ConditionRow::Rent) {
            RowSheet::Range(req) => {
                assert_eq!(req.initial.low(), Some(1_000_000.0));
                assert_eq!(req.domain.max(), 1_500_000.0);
            }
            other => panic!("expected range sheet, got {other:?}"),
        }
        match form.sheet_for(ConditionRow::Operation) {
            RowSheet::Choice(req) => assert_eq!(req.initial.as_deref(), Some("모두 겸함")),
            other => panic!("expected choice sheet, got {other:?}"),
        }
    }
}
