//! Fórmulas de grado y precio
//!
//! Ambas son aritmética pura sobre un solo vehículo. El año actual se
//! inyecta para que los resultados sean reproducibles.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::vehicle::Vehicle;

pub const MAX_GRADE: i32 = 50;
pub const MIN_GRADE: i32 = 1;

/// Por encima de este kilometraje el grado no supera `HIGH_ODOMETER_GRADE_CAP`
pub const HIGH_ODOMETER: i32 = 300_000;
const HIGH_ODOMETER_GRADE_CAP: f64 = 30.0;

const STRONG_SCRATCHES_DIVISOR: f64 = 1.08;
const SMALL_SCRATCHES_DIVISOR: f64 = 1.04;
const ELECTRIC_FAIL_DIVISOR: f64 = 1.08;
const SUSPENSION_FAIL_DIVISOR: f64 = 1.06;

/// Grado de condición 1..=50
///
/// Las divisiones se aplican en este orden fijo: strong scratches, small
/// scratches, electric fail, suspension fail. El resultado se trunca.
pub fn compute_grade(vehicle: &Vehicle, current_year: i32) -> i32 {
    let mut grade = f64::from(MAX_GRADE) - f64::from(current_year - vehicle.year);

    if vehicle.strong_scratches {
        grade /= STRONG_SCRATCHES_DIVISOR;
    }
    if vehicle.small_scratches {
        grade /= SMALL_SCRATCHES_DIVISOR;
    }
    if vehicle.electric_fail {
        grade /= ELECTRIC_FAIL_DIVISOR;
    }
    if vehicle.suspension_fail {
        grade /= SUSPENSION_FAIL_DIVISOR;
    }
    if vehicle.odometer > HIGH_ODOMETER && grade > HIGH_ODOMETER_GRADE_CAP {
        grade = HIGH_ODOMETER_GRADE_CAP;
    }

    (grade.trunc() as i32).clamp(MIN_GRADE, MAX_GRADE)
}

/// Cada punto de grado por debajo de 50 descuenta 1% del MSRP
const GRADE_STEP: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
/// Cada 50.000 km completos multiplican por 0.95
const ODOMETER_STEP_KM: i32 = 50_000;
const ODOMETER_STEP_FACTOR: Decimal = Decimal::from_parts(95, 0, 0, false, 2);

fn exterior_color_factor(color: Option<&str>) -> Decimal {
    match color.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
        Some("black") => Decimal::new(102, 2),
        _ => Decimal::ONE,
    }
}

fn interior_color_factor(color: Option<&str>) -> Decimal {
    match color.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
        Some("red") => Decimal::new(96, 2),
        _ => Decimal::ONE,
    }
}

/// Precio recomendado en unidades enteras
///
/// Monótono: más grado ⇒ más precio, más kilometraje ⇒ menos precio.
/// `None` si el MSRP es tan grande que el producto no cabe en un `Decimal`.
pub fn compute_price(vehicle: &Vehicle) -> Option<Decimal> {
    let grade_factor = Decimal::ONE.checked_sub(GRADE_STEP.checked_mul(Decimal::from(MAX_GRADE - vehicle.grade))?)?;

    let mut price = vehicle.msrp.checked_mul(grade_factor)?;
    for _ in 0..(vehicle.odometer.max(0) / ODOMETER_STEP_KM) {
        price = price.checked_mul(ODOMETER_STEP_FACTOR)?;
        if price.is_zero() {
            break;
        }
    }

    price = price.checked_mul(exterior_color_factor(vehicle.exterior_color.as_deref()))?;
    price = price.checked_mul(interior_color_factor(vehicle.interior_color.as_deref()))?;

    Some(
        price
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .max(Decimal::ZERO),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspected(year: i32, odometer: i32) -> Vehicle {
        Vehicle {
            vin: "1HGBH41JXMN109186".to_string(),
            year,
            odometer,
            ..Default::default()
        }
    }

    #[test]
    fn grade_examples() {
        let cases: Vec<(&str, Box<dyn Fn(&mut Vehicle)>, i32)> = vec![
            ("only year", Box::new(|_| {}), 47),
            ("strong scratches", Box::new(|v| v.strong_scratches = true), 43),
            ("small scratches", Box::new(|v| v.small_scratches = true), 45),
            ("electric fail", Box::new(|v| v.electric_fail = true), 43),
            ("suspension fail", Box::new(|v| v.suspension_fail = true), 44),
            (
                "all factors",
                Box::new(|v| {
                    v.strong_scratches = true;
                    v.small_scratches = true;
                    v.electric_fail = true;
                    v.suspension_fail = true;
                }),
                36,
            ),
            ("high odometer", Box::new(|v| v.odometer = 350_000), 30),
        ];

        for (name, mutate, expected) in cases {
            let mut v = inspected(2022, 12_000);
            mutate(&mut v);
            assert_eq!(compute_grade(&v, 2025), expected, "{}", name);
        }
    }

    #[test]
    fn new_vehicle_without_damage_has_top_grade() {
        assert_eq!(compute_grade(&inspected(2022, 12_000), 2022), 50);
    }

    #[test]
    fn all_flags_same_year() {
        let mut v = inspected(2022, 12_000);
        v.strong_scratches = true;
        v.small_scratches = true;
        v.electric_fail = true;
        v.suspension_fail = true;
        // 50 / (1.08 * 1.04 * 1.08 * 1.06) = 38.88...
        assert_eq!(compute_grade(&v, 2022), 38);
    }

    #[test]
    fn strong_scratches_divide_age_adjusted_grade() {
        for k in 0..10 {
            let mut v = inspected(2022, 12_000);
            v.strong_scratches = true;
            let expected = ((50.0 - f64::from(k)) / 1.08).trunc() as i32;
            assert_eq!(compute_grade(&v, 2022 + k), expected);
        }
    }

    #[test]
    fn high_odometer_caps_at_thirty() {
        assert_eq!(compute_grade(&inspected(2022, 350_000), 2022), 30);
        // Ya por debajo del tope: no cambia
        assert_eq!(compute_grade(&inspected(2000, 350_000), 2025), 25);
    }

    #[test]
    fn grade_never_leaves_range() {
        assert_eq!(compute_grade(&inspected(1900, 0), 2025), MIN_GRADE);
        assert_eq!(compute_grade(&inspected(2026, 0), 2025), MAX_GRADE);
    }

    fn priced(odometer: i32) -> Vehicle {
        Vehicle {
            vin: "1HGBH41JXMN109186".to_string(),
            grade: 47,
            odometer,
            msrp: Decimal::from(99_000),
            ..Default::default()
        }
    }

    #[test]
    fn price_examples() {
        assert_eq!(compute_price(&priced(30_000)), Some(Decimal::from(96_030)));
        assert_eq!(compute_price(&priced(70_000)), Some(Decimal::from(91_229)));

        let mut black = priced(30_000);
        black.exterior_color = Some("Black".to_string());
        assert_eq!(compute_price(&black), Some(Decimal::from(97_951)));

        let mut red = priced(30_000);
        red.interior_color = Some("Red".to_string());
        assert_eq!(compute_price(&red), Some(Decimal::from(92_189)));
    }

    #[test]
    fn price_overflow_is_none() {
        let mut huge = priced(0);
        huge.grade = MAX_GRADE;
        huge.msrp = Decimal::MAX;
        huge.exterior_color = Some("black".to_string());
        assert_eq!(compute_price(&huge), None);
    }

    #[test]
    fn extreme_odometer_prices_to_zero() {
        assert_eq!(compute_price(&priced(i32::MAX)), Some(Decimal::ZERO));
    }

    #[test]
    fn price_is_monotonic() {
        let mut low = priced(30_000);
        low.grade = 20;
        assert!(compute_price(&low) < compute_price(&priced(30_000)));
        assert!(compute_price(&priced(200_000)) < compute_price(&priced(30_000)));
    }
}
