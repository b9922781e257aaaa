use batch_domain::{Level, Member, Person, PersonRecord};
use chrono::NaiveDate;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

#[test]
fn test_small_amount_is_not_eligible() {
    let member = Member::new("kim", 3_000);
    assert!(!member.eligible_for_promotion());
}

#[test]
fn test_normal_member_over_threshold_is_eligible() {
    let member = Member::new("kim", 250_000);
    assert!(member.eligible_for_promotion());
}

#[test]
fn test_silver_member_promotes_to_gold() {
    let mut member = Member::with_level("kim", 330_000, Level::Silver);
    assert!(member.eligible_for_promotion());
    assert_eq!(member.promote_at(day()), Level::Gold);
    assert_eq!(member.level(), Level::Gold);
    assert_eq!(member.updated_date(), Some(day()));
}

#[test]
fn test_promotion_skips_ahead() {
    // 450 000 desde NORMAL salta directamente a GOLD
    let mut member = Member::new("choi", 450_000);
    assert_eq!(member.promote_at(day()), Level::Gold);

    let mut rich = Member::new("park", 500_000);
    assert_eq!(rich.promote_at(day()), Level::Vip);
}

#[test]
fn test_silver_below_its_threshold_stays() {
    let mut member = Member::with_level("kim", 250_000, Level::Silver);
    assert!(!member.eligible_for_promotion());
    assert_eq!(member.promote_at(day()), Level::Silver);
    assert_eq!(member.updated_date(), None);
}

#[test]
fn test_vip_is_untouched() {
    let mut member = Member::with_level("lee", 10_000_000, Level::Vip);
    assert!(!member.eligible_for_promotion());
    assert_eq!(member.promote_at(day()), Level::Vip);
    assert_eq!(member.updated_date(), None);
}

#[test]
fn test_promotion_is_monotonic_over_amounts() {
    for amount in [0u64, 199_999, 200_000, 299_999, 300_000, 499_999, 500_000, 900_000] {
        for level in Level::ALL {
            let mut member = Member::with_level("m", amount, level);
            let after = member.promote_at(day());
            assert!(after >= level, "amount={amount} level={level} after={after}");
        }
    }
}

#[test]
fn test_person_record_copy_and_unknown_name() {
    let person = Person::new(3, "", "31", "Seoul");
    let record = PersonRecord::from(&person);
    assert!(!record.has_name());
    let fixed = record.with_unknown_name();
    assert_eq!(fixed.name, "UNKNOWN");
    assert_eq!(fixed.address, "Seoul");
}
