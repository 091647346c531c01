//! Combines parsed meal fields with the user's profile and targets into the
//! three dashboard payloads: menu, allergen risk table and nutrition summary.

use std::collections::BTreeSet;

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::allergen::{AllergenCode, AllergenProfile, format_codes};
use crate::nutrition::{DailyTargets, Macro, MacroGrams, Tier, pct};
use crate::parse::{extract_allergen_numbers, parse_kcal, parse_nutrients, split_menu_items};

/// Raw text fields of the selected meal record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawMeal<'a> {
    pub dishes: Option<&'a str>,
    pub calories: Option<&'a str>,
    pub nutrients: Option<&'a str>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewOptions {
    pub profile: AllergenProfile,
    pub risky_only: bool,
    pub targets: DailyTargets,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuLine {
    pub text: String,
    pub codes: Vec<AllergenCode>,
    pub risky: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MenuView {
    /// Number of items before the "risky only" filter.
    pub total_items: usize,
    pub lines: Vec<MenuLine>,
}

impl MenuView {
    pub fn has_items(&self) -> bool {
        self.total_items > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskMode {
    /// Rows are items sharing codes with the profile.
    Profile,
    /// No profile: rows list every detected code for information.
    Informational,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskRow {
    pub item: String,
    pub codes: Vec<AllergenCode>,
    pub allergens: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskTable {
    pub mode: RiskMode,
    pub has_items: bool,
    pub rows: Vec<RiskRow>,
}

impl RiskTable {
    pub fn is_profile(&self) -> bool {
        self.mode == RiskMode::Profile
    }

    pub fn risky_count(&self) -> usize {
        match self.mode {
            RiskMode::Profile => self.rows.len(),
            RiskMode::Informational => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroBar {
    pub nutrient: Macro,
    pub label: &'static str,
    pub grams: f64,
    /// Height relative to the tallest bar, 0–100.
    pub scale: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetProgress {
    pub label: &'static str,
    pub unit: &'static str,
    pub value: Option<f64>,
    pub target: f64,
    pub percent: Option<i64>,
    /// Meter width, `percent` clamped to 0–100.
    pub meter: u8,
    pub tier: Option<Tier>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionSummary {
    pub kcal: Option<f64>,
    pub macros: MacroGrams,
    pub bars: Vec<MacroBar>,
    pub progress: Vec<TargetProgress>,
    pub nutrients: Vec<NutrientRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealView {
    pub menu: MenuView,
    pub allergens: RiskTable,
    pub nutrition: NutritionSummary,
}

struct MenuItem {
    text: String,
    codes: BTreeSet<AllergenCode>,
}

pub fn assemble(meal: RawMeal<'_>, options: &ViewOptions) -> MealView {
    let items: Vec<MenuItem> = split_menu_items(meal.dishes)
        .into_iter()
        .map(|text| {
            let codes = extract_allergen_numbers(Some(&text));
            MenuItem { text, codes }
        })
        .collect();

    MealView {
        menu: menu_view(&items, options),
        allergens: risk_table(&items, &options.profile),
        nutrition: nutrition_summary(meal, &options.targets),
    }
}

fn menu_view(items: &[MenuItem], options: &ViewOptions) -> MenuView {
    let lines = items
        .iter()
        .map(|item| MenuLine {
            text: item.text.clone(),
            codes: item.codes.iter().copied().collect(),
            risky: options.profile.is_risky(&item.codes),
        })
        .filter(|line| !options.risky_only || line.risky)
        .collect();

    MenuView {
        total_items: items.len(),
        lines,
    }
}

fn risk_table(items: &[MenuItem], profile: &AllergenProfile) -> RiskTable {
    let mode = if profile.is_empty() {
        RiskMode::Informational
    } else {
        RiskMode::Profile
    };

    let rows = items
        .iter()
        .filter_map(|item| {
            let codes = match mode {
                RiskMode::Profile => profile.overlap(&item.codes),
                RiskMode::Informational => item.codes.clone(),
            };

            (!codes.is_empty()).then(|| RiskRow {
                item: item.text.clone(),
                allergens: format_codes(&codes),
                codes: codes.into_iter().collect(),
            })
        })
        .collect();

    RiskTable {
        mode,
        has_items: !items.is_empty(),
        rows,
    }
}

fn nutrition_summary(meal: RawMeal<'_>, targets: &DailyTargets) -> NutritionSummary {
    let kcal = parse_kcal(meal.calories);
    let table = parse_nutrients(meal.nutrients);
    let macros = MacroGrams::from_table(&table);

    let present: Vec<(Macro, f64)> = Macro::iter()
        .filter_map(|nutrient| macros.get(nutrient).map(|grams| (nutrient, grams)))
        .filter(|(_, grams)| *grams > 0.0)
        .collect();
    let tallest = present.iter().map(|(_, grams)| *grams).fold(0.0, f64::max);
    let bars = present
        .into_iter()
        .map(|(nutrient, grams)| MacroBar {
            nutrient,
            label: nutrient.label(),
            grams,
            scale: ((grams / tallest) * 100.0).round().clamp(0.0, 100.0) as u8,
        })
        .collect();

    let mut progress = vec![progress_row("열량", "kcal", kcal, targets.energy)];
    progress.extend(Macro::iter().map(|nutrient| {
        progress_row(
            nutrient.label(),
            "g",
            macros.get(nutrient),
            targets.for_macro(nutrient),
        )
    }));

    let nutrients = table
        .sorted()
        .into_iter()
        .map(|(label, value)| NutrientRow {
            label: label.to_owned(),
            value: value.to_string(),
        })
        .collect();

    NutritionSummary {
        kcal,
        macros,
        bars,
        progress,
        nutrients,
    }
}

fn progress_row(
    label: &'static str,
    unit: &'static str,
    value: Option<f64>,
    target: f64,
) -> TargetProgress {
    let percent = pct(value, Some(target));
    TargetProgress {
        label,
        unit,
        value,
        target,
        percent,
        meter: percent.map_or(0, |percent| percent.clamp(0, 100) as u8),
        tier: percent.map(Tier::from_percent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::TargetPreset;

    const DISHES: &str = "현미밥<br/>어묵국(5,6,13)<br/>닭갈비(5,6,13,15)<br/>배추김치(9,13)<br/>사과";
    const CALORIES: &str = "824.00 Kcal";
    const NUTRIENTS: &str = "탄수화물(g) : 110 / 단백질(g) : 35 / 지방(g) : 20 / 나트륨(mg) : 1500";

    fn meal() -> RawMeal<'static> {
        RawMeal {
            dishes: Some(DISHES),
            calories: Some(CALORIES),
            nutrients: Some(NUTRIENTS),
        }
    }

    fn options(profile: &[AllergenCode], risky_only: bool) -> ViewOptions {
        ViewOptions {
            profile: AllergenProfile::new(profile.iter().copied()),
            risky_only,
            targets: DailyTargets {
                energy: 2000.0,
                carbohydrate: 330.0,
                protein: 55.0,
                fat: 54.0,
            },
        }
    }

    #[test]
    fn menu_flags_items_sharing_profile_codes() {
        let view = assemble(meal(), &options(&[15], false));
        assert_eq!(view.menu.total_items, 5);
        let risky: Vec<&str> = view
            .menu
            .lines
            .iter()
            .filter(|line| line.risky)
            .map(|line| line.text.as_str())
            .collect();
        assert_eq!(risky, vec!["닭갈비(5,6,13,15)"]);
    }

    #[test]
    fn risky_only_hides_safe_items() {
        let view = assemble(meal(), &options(&[13], true));
        assert_eq!(view.menu.lines.len(), 3);
        assert!(view.menu.lines.iter().all(|line| line.risky));

        let view = assemble(meal(), &options(&[], true));
        assert!(view.menu.lines.is_empty());
        assert!(view.menu.has_items());
    }

    #[test]
    fn risk_table_lists_profile_overlap() {
        let view = assemble(meal(), &options(&[5, 9], false));
        let table = view.allergens;
        assert!(table.is_profile());
        assert_eq!(table.risky_count(), 3);
        assert_eq!(table.rows[0].item, "어묵국(5,6,13)");
        assert_eq!(table.rows[0].allergens, "5(대두)");
        assert_eq!(table.rows[2].allergens, "9(새우)");
    }

    #[test]
    fn risk_table_without_profile_is_informational() {
        let view = assemble(meal(), &options(&[], false));
        let table = view.allergens;
        assert_eq!(table.mode, RiskMode::Informational);
        assert_eq!(table.risky_count(), 0);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(
            table.rows[1].allergens,
            "5(대두), 6(밀), 13(아황산류), 15(닭고기)"
        );
        assert!(view.menu.lines.iter().all(|line| !line.risky));
    }

    #[test]
    fn nutrition_compares_against_targets() {
        let view = assemble(meal(), &options(&[], false));
        let nutrition = view.nutrition;
        assert_eq!(nutrition.kcal, Some(824.0));
        assert_eq!(nutrition.macros.carbohydrate, Some(110.0));

        let percents: Vec<Option<i64>> = nutrition.progress.iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![Some(41), Some(33), Some(64), Some(37)]);
        assert_eq!(nutrition.progress[2].tier, Some(Tier::High));
        assert_eq!(nutrition.progress[1].tier, Some(Tier::Medium));

        assert_eq!(nutrition.bars.len(), 3);
        assert_eq!(nutrition.bars[0].scale, 100);
        assert_eq!(nutrition.bars[2].scale, 18);

        let labels: Vec<&str> = nutrition.nutrients.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["나트륨(mg)", "단백질(g)", "지방(g)", "탄수화물(g)"]);
    }

    #[test]
    fn missing_fields_degrade_to_empty_views() {
        let view = assemble(RawMeal::default(), &ViewOptions::default());
        assert!(!view.menu.has_items());
        assert!(!view.allergens.has_items);
        assert_eq!(view.nutrition.kcal, None);
        assert!(view.nutrition.bars.is_empty());
        assert!(view.nutrition.nutrients.is_empty());
        assert!(view.nutrition.progress.iter().all(|p| p.percent.is_none()));
        assert_eq!(ViewOptions::default().targets, TargetPreset::Adult.targets());
    }

    #[test]
    fn meter_is_clamped_but_percent_is_not() {
        let mut options = options(&[], false);
        options.targets.energy = 500.0;
        let view = assemble(meal(), &options);

        let energy = &view.nutrition.progress[0];
        assert_eq!(energy.percent, Some(165));
        assert_eq!(energy.meter, 100);
        assert_eq!(view.nutrition.progress[1].meter, 33);

        let empty = assemble(RawMeal::default(), &options);
        assert!(empty.nutrition.progress.iter().all(|p| p.meter == 0));
    }

    #[test]
    fn zero_macros_are_left_out_of_the_chart() {
        let view = assemble(
            RawMeal {
                nutrients: Some("탄수화물(g):0 / 단백질(g):12"),
                ..Default::default()
            },
            &ViewOptions::default(),
        );
        assert_eq!(view.nutrition.bars.len(), 1);
        assert_eq!(view.nutrition.bars[0].nutrient, Macro::Protein);
        assert_eq!(view.nutrition.progress[1].percent, Some(0));
    }
}
