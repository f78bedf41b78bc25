use std::collections::BTreeSet;

use tracing::instrument;
use uuid::Uuid;

use super::{Choice, FieldError, FieldSpec, Form, FormData, FormErrors, Widget};
use crate::domain::{Car, Driver, Manufacturer};

const MODEL_MAX_LENGTH: usize = 255;

/// Create and edit form for a car, including its driver assignments.
///
/// The manufacturer is picked from a drop-down and the drivers from a list
/// of checkboxes covering every known driver. Choices are submitted as
/// hyphenated lowercase ids.
#[derive(Debug, Clone, Default)]
pub struct CarForm {
    manufacturers: Vec<Manufacturer>,
    drivers: Vec<Driver>,
    instance: Option<Uuid>,
}

impl CarForm {
    /// Creates a form for a new car.
    #[must_use]
    pub const fn new(manufacturers: Vec<Manufacturer>, drivers: Vec<Driver>) -> Self {
        Self {
            manufacturers,
            drivers,
            instance: None,
        }
    }

    /// Creates a form that edits `car`, keeping its id.
    #[must_use]
    pub const fn for_instance(
        car: &Car,
        manufacturers: Vec<Manufacturer>,
        drivers: Vec<Driver>,
    ) -> Self {
        Self {
            manufacturers,
            drivers,
            instance: Some(car.id),
        }
    }

    /// Returns the submission that pre-fills the form for `car`.
    #[must_use]
    pub fn initial(car: &Car) -> FormData {
        let mut data = FormData::new()
            .with("model", car.model.as_str())
            .with("manufacturer", car.manufacturer.to_string());
        for driver in &car.drivers {
            data.insert("drivers", driver.to_string());
        }
        data
    }

    fn model_field() -> FieldSpec {
        FieldSpec::new("model", "Model")
            .required()
            .max_length(MODEL_MAX_LENGTH)
    }

    fn manufacturer_field(&self) -> FieldSpec {
        let choices = self
            .manufacturers
            .iter()
            .map(|m| Choice {
                value: m.id.to_string(),
                label: m.name.clone(),
            })
            .collect();

        FieldSpec::new("manufacturer", "Manufacturer")
            .required()
            .widget(Widget::Select)
            .choices(choices)
    }

    fn drivers_field(&self) -> FieldSpec {
        let choices = self
            .drivers
            .iter()
            .map(|d| Choice {
                value: d.id.to_string(),
                label: d.display_name(),
            })
            .collect();

        FieldSpec::new("drivers", "Drivers")
            .widget(Widget::CheckboxSelectMultiple)
            .choices(choices)
    }
}

fn parse_id(value: &str) -> Result<Uuid, FieldError> {
    value
        .parse()
        .map_err(|_| FieldError::InvalidChoice(value.to_string()))
}

impl Form for CarForm {
    type Output = Car;

    fn name(&self) -> &'static str {
        "car"
    }

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            Self::model_field(),
            self.manufacturer_field(),
            self.drivers_field(),
        ]
    }

    #[instrument(level = "debug", skip_all, fields(form = self.name()))]
    fn clean(&self, data: &FormData) -> Result<Car, FormErrors> {
        let mut errors = FormErrors::default();

        let model = errors.collect("model", Self::model_field().clean_required(data));

        let manufacturer = errors.collect(
            "manufacturer",
            self.manufacturer_field()
                .clean_required(data)
                .and_then(|v| parse_id(v).map_err(|e| vec![e])),
        );

        let drivers = errors.collect(
            "drivers",
            self.drivers_field().clean_multiple(data).and_then(|values| {
                values
                    .into_iter()
                    .map(parse_id)
                    .collect::<Result<BTreeSet<_>, _>>()
                    .map_err(|e| vec![e])
            }),
        );

        match (model, manufacturer, drivers) {
            (Some(model), Some(manufacturer), Some(drivers)) if errors.is_empty() => {
                let id = self.instance.unwrap_or_else(Uuid::new_v4);
                tracing::info!(%id, model, drivers = drivers.len(), "car form accepted");
                Ok(Car {
                    id,
                    model: model.to_string(),
                    manufacturer,
                    drivers,
                })
            }
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manufacturer(name: &str) -> Manufacturer {
        Manufacturer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            country: "Japan".to_string(),
        }
    }

    fn driver(username: &str, license: &str) -> Driver {
        Driver {
            id: Uuid::new_v4(),
            username: username.parse().unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            license_number: license.parse().unwrap(),
        }
    }

    struct Fixture {
        form: CarForm,
        toyota: Uuid,
        alice: Uuid,
        bob: Uuid,
    }

    fn fixture() -> Fixture {
        let toyota = manufacturer("Toyota");
        let alice = driver("alice", "ABC12345");
        let bob = driver("bob", "XYZ54321");
        Fixture {
            toyota: toyota.id,
            alice: alice.id,
            bob: bob.id,
            form: CarForm::new(vec![toyota, manufacturer("Honda")], vec![alice, bob]),
        }
    }

    #[test]
    fn accepts_car_with_drivers() {
        let f = fixture();
        let data = FormData::new()
            .with("model", "Corolla")
            .with("manufacturer", f.toyota.to_string())
            .with("drivers", f.alice.to_string())
            .with("drivers", f.bob.to_string());

        let car = f.form.clean(&data).unwrap();
        assert_eq!(car.model, "Corolla");
        assert_eq!(car.manufacturer, f.toyota);
        assert_eq!(car.drivers, BTreeSet::from([f.alice, f.bob]));
    }

    #[test]
    fn drivers_are_optional() {
        let f = fixture();
        let data = FormData::new()
            .with("model", "Corolla")
            .with("manufacturer", f.toyota.to_string());

        let car = f.form.clean(&data).unwrap();
        assert!(car.drivers.is_empty());
    }

    #[test]
    fn rejects_unknown_choices() {
        let f = fixture();
        let stranger = Uuid::new_v4().to_string();
        let data = FormData::new()
            .with("model", "Corolla")
            .with("manufacturer", "not-an-id")
            .with("drivers", stranger.as_str());

        let errors = f.form.clean(&data).unwrap_err();
        assert_eq!(
            errors.get("manufacturer"),
            &[FieldError::InvalidChoice("not-an-id".to_string())]
        );
        assert_eq!(errors.get("drivers"), &[FieldError::InvalidChoice(stranger)]);
        assert!(!errors.has("model"));
    }

    #[test]
    fn requires_model_and_manufacturer() {
        let errors = fixture().form.clean(&FormData::new()).unwrap_err();
        assert_eq!(errors.get("model"), &[FieldError::Required]);
        assert_eq!(errors.get("manufacturer"), &[FieldError::Required]);
        assert!(!errors.has("drivers"));
    }

    #[test]
    fn rejects_ids_when_nothing_is_offered() {
        let form = CarForm::new(vec![], vec![]);
        let manufacturer = Uuid::new_v4().to_string();
        let driver = Uuid::new_v4().to_string();
        let data = FormData::new()
            .with("model", "Corolla")
            .with("manufacturer", manufacturer.as_str())
            .with("drivers", driver.as_str());

        let errors = form.clean(&data).unwrap_err();
        assert_eq!(
            errors.get("manufacturer"),
            &[FieldError::InvalidChoice(manufacturer)]
        );
        assert_eq!(errors.get("drivers"), &[FieldError::InvalidChoice(driver)]);
    }

    #[test]
    fn empty_offer_still_allows_no_drivers() {
        let form = CarForm::new(vec![], vec![]);
        let errors = form
            .clean(&FormData::new().with("model", "Corolla"))
            .unwrap_err();
        assert_eq!(errors.get("manufacturer"), &[FieldError::Required]);
        assert!(!errors.has("drivers"));
    }

    #[test]
    fn editing_keeps_id() {
        let f = fixture();
        let existing = Car {
            id: Uuid::new_v4(),
            model: "Prius".to_string(),
            manufacturer: f.toyota,
            drivers: BTreeSet::from([f.alice]),
        };

        let form = CarForm::for_instance(
            &existing,
            f.form.manufacturers.clone(),
            f.form.drivers.clone(),
        );
        let data = CarForm::initial(&existing);
        assert_eq!(form.clean(&data).unwrap(), existing);
    }

    #[test]
    fn fields_offer_every_driver() {
        let fields = fixture().form.fields();
        let drivers = &fields[2];
        assert_eq!(drivers.widget, Widget::CheckboxSelectMultiple);
        assert!(!drivers.required);
        assert_eq!(
            drivers
                .choices
                .iter()
                .flatten()
                .map(|c| c.label.as_str())
                .collect::<Vec<_>>(),
            ["alice", "bob"]
        );
        assert_eq!(fields[1].widget, Widget::Select);
    }
}
