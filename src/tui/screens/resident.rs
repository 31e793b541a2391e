//! Resident records.

use super::record::{FieldError, FieldSpec, RecordForm, RecordIds};
use crate::model::{Resident, DATE_FORMAT};
use crate::store::{EntityStore, RecordStore};
use crate::tui::buffer::{InputKind, TextField};
use chrono::NaiveDate;

const ID: usize = 0;
const NAME: usize = 1;
const ROOM: usize = 2;
const BORN: usize = 3;
const DIET: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResidentForm;

impl RecordForm for ResidentForm {
    type Record = Resident;

    const TITLE: &'static str = "Residents";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("resident.id", "Resident ID", InputKind::Text, 12),
        FieldSpec::required("resident.name", "Full name", InputKind::Text, 48),
        FieldSpec::required("resident.room", "Room", InputKind::Number, 4),
        FieldSpec::required("resident.born", "Born (YYYY-MM-DD)", InputKind::Text, 10),
        FieldSpec::optional("resident.diet", "Diet notes", 64),
    ];
    const IDS: RecordIds = RecordIds {
        buttons: [
            "resident.submit",
            "resident.retrieve",
            "resident.delete",
            "resident.list",
            "resident.clear",
            "resident.back",
        ],
        table: "resident.table",
        required: "resident.required",
        invalid_key: "resident.invalid_key",
        invalid_field: "resident.invalid_field",
        not_found: "resident.not_found",
        conflict: "resident.conflict",
        confirm_delete: "resident.confirm_delete",
    };
    const KEY_HINT: &'static str = "Use up to 12 letters, digits or dashes.";

    fn table(store: &mut dyn RecordStore) -> &mut dyn EntityStore<Resident> {
        store.residents()
    }

    fn is_valid_key(key: &str) -> bool {
        Resident::is_valid_id(key)
    }

    fn build(fields: &[TextField]) -> Result<Resident, FieldError> {
        let room = fields[ROOM]
            .value()
            .parse::<u32>()
            .map_err(|_| FieldError::new("Room", "must be a whole number"))?;
        if room == 0 {
            return Err(FieldError::new("Room", "must be greater than zero"));
        }
        let birth_date = NaiveDate::parse_from_str(fields[BORN].value(), DATE_FORMAT)
            .map_err(|_| FieldError::new("Born", "expected a date like 1938-05-17"))?;
        if birth_date > chrono::Local::now().date_naive() {
            return Err(FieldError::new("Born", "cannot be in the future"));
        }

        Ok(Resident {
            id: Self::key(fields),
            full_name: fields[NAME].value().to_string(),
            room,
            birth_date,
            diet: fields[DIET].value().to_string(),
        })
    }

    fn fill(fields: &mut [TextField], record: &Resident) {
        fields[ID].set(&record.id);
        fields[NAME].set(&record.full_name);
        fields[ROOM].set(&record.room.to_string());
        fields[BORN].set(&record.birth_date.format(DATE_FORMAT).to_string());
        fields[DIET].set(&record.diet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: [&str; 5]) -> Vec<TextField> {
        ResidentForm::FIELDS
            .iter()
            .zip(values)
            .map(|(spec, value)| {
                let mut field = TextField::new(spec.kind, spec.max_len);
                field.set(value);
                field
            })
            .collect()
    }

    #[test]
    fn test_build_trims_and_parses() {
        let resident =
            ResidentForm::build(&fields([" R1 ", " Anna Bates ", "7", "1950-01-31", ""])).unwrap();
        assert_eq!(resident.id, "R1");
        assert_eq!(resident.full_name, "Anna Bates");
        assert_eq!(resident.room, 7);
        assert_eq!(resident.birth_date, NaiveDate::from_ymd_opt(1950, 1, 31).unwrap());
    }

    #[test]
    fn test_build_rejects_bad_values() {
        let err = ResidentForm::build(&fields(["R1", "A", "0", "1950-01-31", ""])).unwrap_err();
        assert_eq!(err.field, "Room");

        let err = ResidentForm::build(&fields(["R1", "A", "3", "31/01/1950", ""])).unwrap_err();
        assert_eq!(err.field, "Born");

        let err = ResidentForm::build(&fields(["R1", "A", "3", "2999-01-01", ""])).unwrap_err();
        assert!(err.to_string().contains("future"));
    }

    #[test]
    fn test_fill_then_build_is_stable() {
        let original =
            ResidentForm::build(&fields(["R2", "John Bates", "9", "1948-11-02", "no salt"])).unwrap();
        let mut inputs = fields(["", "", "", "", ""]);
        ResidentForm::fill(&mut inputs, &original);
        assert_eq!(inputs[BORN].text(), "1948-11-02");
        assert_eq!(ResidentForm::build(&inputs).unwrap(), original);
    }
}
