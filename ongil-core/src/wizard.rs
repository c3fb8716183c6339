//! Three-step analysis wizard: place, business category, store conditions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisRequest;
use crate::conditions::{ConditionsError, ConditionsForm};
use crate::sheet::{ChoiceItem, ChoiceRequest};

/// Map center used before the user picks a place (Seoul City Hall).
pub const DEFAULT_COORDINATES: Coordinates = Coordinates {
    lat: 37.5665,
    lng: 126.9780,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Parse `"lat,lng"`; whitespace anywhere is ignored.
    pub fn parse(text: &str) -> Result<Self, ConditionsError> {
        let invalid = || ConditionsError::InvalidCoordinates(text.to_string());
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let (lat, lng) = compact.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.parse().map_err(|_| invalid())?;
        let lng: f64 = lng.parse().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(invalid());
        }
        Ok(Self { lat, lng })
    }
}

impl FromStr for Coordinates {
    type Err = ConditionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coordinates::parse(s)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

pub fn category_options() -> Vec<ChoiceItem> {
    vec![
        ChoiceItem::new("카페/디저트", "Cafe / dessert"),
        ChoiceItem::new("피자/치킨", "Pizza / chicken"),
        ChoiceItem::new("주점/술집", "Pub / bar"),
        ChoiceItem::new("패스트푸드", "Fast food"),
        ChoiceItem::new("한식", "Korean"),
        ChoiceItem::new("아시안", "Asian"),
        ChoiceItem::new("양식", "Western"),
        ChoiceItem::new("중식", "Chinese"),
        ChoiceItem::new("일식", "Japanese"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Step {
    #[default]
    Place,
    Category,
    Conditions,
}

impl Step {
    pub fn number(self) -> usize {
        match self {
            Step::Place => 1,
            Step::Category => 2,
            Step::Conditions => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Place => "Choose a location",
            Step::Category => "Choose a business category",
            Step::Conditions => "Set store conditions",
        }
    }
}

/// Wizard progress and committed values. Serializable so a session survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wizard {
    pub step: Step,
    pub place: Option<Coordinates>,
    pub category: Option<String>,
    pub conditions: ConditionsForm,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_place(&mut self, place: Coordinates) {
        self.place = Some(place);
    }

    /// Unknown categories are ignored.
    pub fn set_category(&mut self, key: &str) {
        if category_options().iter().any(|it| it.key == key) {
            self.category = Some(key.to_string());
        }
    }

    pub fn category_label(&self) -> Option<String> {
        let key = self.category.as_ref()?;
        category_options()
            .into_iter()
            .find(|it| &it.key == key)
            .map(|it| it.label)
    }

    pub fn category_sheet(&self) -> ChoiceRequest {
        ChoiceRequest::new(Step::Category.title(), category_options())
            .initial(self.category.clone())
    }

    pub fn can_advance(&self) -> bool {
        match self.step {
            Step::Place => self.place.is_some(),
            Step::Category => self.category.is_some(),
            Step::Conditions => self.conditions.can_submit(),
        }
    }

    /// Move to the next step. Returns false on the last step or while the current one is incomplete.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        match self.step {
            Step::Place => self.step = Step::Category,
            Step::Category => self.step = Step::Conditions,
            Step::Conditions => return false,
        }
        true
    }

    /// Returns false on the first step.
    pub fn back(&mut self) -> bool {
        match self.step {
            Step::Place => return false,
            Step::Category => self.step = Step::Place,
            Step::Conditions => self.step = Step::Category,
        }
        true
    }

    pub fn build_request(&self) -> Result<AnalysisRequest, ConditionsError> {
        let place = self.place.ok_or(ConditionsError::MissingAddress)?;
        let category = self.category.as_deref().ok_or(ConditionsError::MissingCategory)?;
        self.conditions.to_request(&place.to_string(), category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::ConditionRow;
    use crate::range::RangePair;

    #[test]
    fn coordinates_parse_and_display() {
        let c = Coordinates::parse(" 37.5665 , 126.978 ").unwrap();
        assert_eq!(c.lat, 37.5665);
        assert_eq!(c.to_string(), "37.5665,126.978");
        assert!(Coordinates::parse("37.5").is_err());
        assert!(Coordinates::parse("abc,1").is_err());
        assert!(Coordinates::parse("91,0").is_err());
        assert_eq!("1,2".parse::<Coordinates>().unwrap().lng, 2.0);
    }

    #[test]
    fn steps_gate_on_completion() {
        let mut w = Wizard::new();
        assert!(!w.advance());
        w.set_place(DEFAULT_COORDINATES);
        assert!(w.advance());
        assert_eq!(w.step, Step::Category);
        w.set_category("not a category");
        assert!(!w.advance());
        w.set_category("한식");
        assert!(w.advance());
        assert_eq!(w.step, Step::Conditions);
        assert!(!w.advance());
        assert!(w.back());
        assert!(w.back());
        assert!(!w.back());
    }

    #[test]
    fn build_request_uses_place_and_category() {
        let mut w = Wizard::new();
        assert_eq!(w.build_request(), Err(ConditionsError::MissingAddress));
        w.set_place(Coordinates { lat: 37.5, lng: 127.0 });
        w.set_category("일식");
        let form = &mut w.conditions;
        form.apply_range(ConditionRow::AveragePrice, RangePair::sorted(5000.0, 8000.0));
        form.apply_range(ConditionRow::Rent, RangePair::sorted(500_000.0, 800_000.0));
        form.apply_choice(ConditionRow::District, "관광지/피서지".into());
        form.apply_choice(ConditionRow::Operation, "배달 운영 위주".into());
        form.apply_choice(ConditionRow::Size, "51평 이상".into());
        form.apply_choice(ConditionRow::Floor, "지하층".into());
        let req = w.build_request().unwrap();
        assert_eq!(req.addr, "37.5,127");
        assert_eq!(req.category, "일식");
        assert_eq!(req.height, "0");
        assert_eq!(req.budget.max, 80);
        assert_eq!(req.management_method, "배달 영업 위주");
    }

    #[test]
    fn category_label_lookup() {
        let mut w = Wizard::new();
        assert_eq!(w.category_label(), None);
        w.set_category("카페/디저트");
        assert_eq!(w.category_label().as_deref(), Some("Cafe / dessert"));
        assert_eq!(w.category_sheet().items.len(), 9);
    }
}
