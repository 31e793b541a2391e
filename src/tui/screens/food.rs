//! Menu items.

use super::record::{FieldError, FieldSpec, RecordForm, RecordIds};
use crate::model::Food;
use crate::store::{EntityStore, RecordStore};
use crate::tui::buffer::{InputKind, TextField};

const CODE: usize = 0;
const NAME: usize = 1;
const CALORIES: usize = 2;
const ALLERGENS: usize = 3;

/// Upper bound on a single serving.
const MAX_CALORIES: u32 = 5000;

#[derive(Debug, Clone, Copy, Default)]
pub struct FoodForm;

impl RecordForm for FoodForm {
    type Record = Food;

    const TITLE: &'static str = "Foods";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("food.code", "Code", InputKind::Text, 12),
        FieldSpec::required("food.name", "Name", InputKind::Text, 48),
        FieldSpec::required("food.calories", "Calories", InputKind::Number, 4),
        FieldSpec::optional("food.allergens", "Allergens", 64),
    ];
    const IDS: RecordIds = RecordIds {
        buttons: [
            "food.submit",
            "food.retrieve",
            "food.delete",
            "food.list",
            "food.clear",
            "food.back",
        ],
        table: "food.table",
        required: "food.required",
        invalid_key: "food.invalid_key",
        invalid_field: "food.invalid_field",
        not_found: "food.not_found",
        conflict: "food.conflict",
        confirm_delete: "food.confirm_delete",
    };
    const KEY_HINT: &'static str = "Use up to 12 letters, digits or dashes.";

    fn table(store: &mut dyn RecordStore) -> &mut dyn EntityStore<Food> {
        store.foods()
    }

    fn is_valid_key(key: &str) -> bool {
        Food::is_valid_code(key)
    }

    /// Codes are stored upper-case; `soup-1` and `SOUP-1` are the same item.
    fn key(fields: &[TextField]) -> String {
        fields
            .get(CODE)
            .map(|f| f.value().to_uppercase())
            .unwrap_or_default()
    }

    fn build(fields: &[TextField]) -> Result<Food, FieldError> {
        let calories = fields[CALORIES]
            .value()
            .parse::<u32>()
            .map_err(|_| FieldError::new("Calories", "must be a whole number"))?;
        if calories > MAX_CALORIES {
            return Err(FieldError::new(
                "Calories",
                format!("must be at most {MAX_CALORIES}"),
            ));
        }

        Ok(Food {
            code: Self::key(fields),
            name: fields[NAME].value().to_string(),
            calories,
            allergens: fields[ALLERGENS].value().to_string(),
        })
    }

    fn fill(fields: &mut [TextField], record: &Food) {
        fields[CODE].set(&record.code);
        fields[NAME].set(&record.name);
        fields[CALORIES].set(&record.calories.to_string());
        fields[ALLERGENS].set(&record.allergens);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::screens::testing::{Harness, WINDOW};
    use crate::tui::screens::{FoodScreen, RecordFlags};
    use crate::tui::state::AppState;
    use crate::tui::traits::Screen;

    fn screen() -> FoodScreen {
        let mut screen = FoodScreen::new();
        screen.update_positions(WINDOW).unwrap();
        screen
    }

    #[test]
    fn test_code_is_case_insensitive() {
        let mut h = Harness::new(AppState::Foods);
        let mut screen = screen();

        h.ui.type_into("food.code", "soup-1")
            .type_into("food.name", "Leek soup")
            .type_into("food.calories", "180")
            .press("food.submit");
        h.frame(&mut screen);
        assert!(h.store.foods.exists("SOUP-1"));

        h.ui.type_into("food.code", "Soup-1").press("food.retrieve");
        h.frame(&mut screen);
        assert_eq!(screen.fields()[NAME].text(), "Leek soup");
    }

    #[test]
    fn test_calorie_limit() {
        let mut h = Harness::new(AppState::Foods);
        let mut screen = screen();

        h.ui.type_into("food.code", "CAKE")
            .type_into("food.name", "Cake")
            .type_into("food.calories", "9000")
            .press("food.submit");
        h.frame(&mut screen);

        assert!(screen.flags().is_set(RecordFlags::FIELD_INVALID));
        assert!(h.dialog_text().unwrap().contains("Calories"));
        assert_eq!(h.store.foods.count(), 0);
    }

    #[test]
    fn test_conflict_message_names_code() {
        let mut h = Harness::new(AppState::Foods);
        h.store
            .foods
            .create(&Food {
                code: "TEA".to_string(),
                name: "Tea".to_string(),
                calories: 2,
                allergens: String::new(),
            })
            .unwrap();
        let mut screen = screen();

        h.ui.type_into("food.code", "tea")
            .type_into("food.name", "Green tea")
            .type_into("food.calories", "1")
            .press("food.submit");
        h.frame(&mut screen);

        let text = h.dialog_text().unwrap();
        assert!(text.contains("food with key 'TEA'"), "{text}");
    }
}
