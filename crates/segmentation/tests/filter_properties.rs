//! Filtering properties over the demo customer list.

use audience_core::demo::demo_customers;
use audience_core::{Customer, CustomerField, ZeroValuePolicy};
use audience_segmentation::{
    evaluate_condition, filter_customers, matches_customer, parse_condition, ComparisonOperator,
    Condition, ConditionList, ConditionUpdate, SegmentFilterEngine,
};

fn ids(customers: &[&Customer]) -> Vec<String> {
    customers.iter().map(|c| c.id.clone()).collect()
}

#[test]
fn empty_conditions_match_everyone_in_order() {
    let customers = demo_customers();
    let matched = filter_customers(&customers, &[]);
    assert_eq!(matched.len(), customers.len());
    assert_eq!(
        ids(&matched),
        customers.iter().map(|c| c.id.clone()).collect::<Vec<_>>()
    );
}

#[test]
fn spend_threshold_splits_customers() {
    let conditions = vec![parse_condition("totalSpend > 400").unwrap()];
    let rich = Customer::new("r", "Rich").with_spend(500.0).with_visits(1);
    let modest = Customer::new("m", "Modest").with_spend(300.0).with_visits(1);
    assert!(matches_customer(&rich, &conditions));
    assert!(!matches_customer(&modest, &conditions));
}

#[test]
fn or_clause_admits_either_match() {
    let conditions = vec![
        parse_condition("visits > 10").unwrap(),
        parse_condition("or totalSpend > 900").unwrap(),
    ];
    let frank = Customer::new("6", "Frank").with_spend(1000.0).with_visits(20);
    let bob = Customer::new("2", "Bob").with_spend(200.0).with_visits(5);
    assert!(matches_customer(&frank, &conditions));
    assert!(!matches_customer(&bob, &conditions));

    let customers = demo_customers();
    // David 15, Eve 12, Frank 20, Ivy 11 visits
    assert_eq!(ids(&filter_customers(&customers, &conditions)), ["4", "5", "6", "9"]);
}

#[test]
fn non_numeric_value_never_excludes() {
    let customers = demo_customers();
    for field in CustomerField::ALL {
        for operator in ComparisonOperator::ALL {
            let conditions = vec![Condition::new(field, operator, "abc")];
            assert_eq!(filter_customers(&customers, &conditions).len(), customers.len());
        }
    }
}

#[test]
fn zero_field_never_excludes_by_default() {
    // Inherited quirk: zero is treated as "no value". Compare policy fixes it.
    let customers = vec![
        Customer::new("z", "Zero").with_spend(0.0).with_visits(4),
        Customer::new("p", "Positive").with_spend(50.0).with_visits(4),
    ];
    let conditions = vec![Condition::new(
        CustomerField::TotalSpend,
        ComparisonOperator::GreaterThan,
        "10",
    )];

    assert_eq!(ids(&filter_customers(&customers, &conditions)), ["z", "p"]);

    let strict = SegmentFilterEngine::with_zero_policy(ZeroValuePolicy::Compare);
    assert_eq!(ids(&strict.filter_customers(&customers, &conditions)), ["p"]);
}

#[test]
fn zero_field_under_upper_bound() {
    let customers = vec![
        Customer::new("z", "Zero").with_spend(0.0).with_visits(4),
        Customer::new("s", "Small").with_spend(5.0).with_visits(4),
        Customer::new("b", "Big").with_spend(50.0).with_visits(4),
    ];
    let below = vec![parse_condition("totalSpend < 10").unwrap()];
    let at_most = vec![parse_condition("totalSpend <= 5").unwrap()];
    // Zero passes an upper bound whether it is skipped or compared.
    let idle = vec![
        Customer::new("i", "Idle").with_spend(20.0),
        Customer::new("a", "Active").with_spend(20.0).with_visits(3),
    ];
    let no_visits = vec![parse_condition("visits < 1").unwrap()];

    let lenient = SegmentFilterEngine::default();
    assert_eq!(ids(&lenient.filter_customers(&customers, &below)), ["z", "s"]);
    assert_eq!(ids(&lenient.filter_customers(&customers, &at_most)), ["z", "s"]);
    assert_eq!(ids(&lenient.filter_customers(&idle, &no_visits)), ["i"]);

    let strict = SegmentFilterEngine::with_zero_policy(ZeroValuePolicy::Compare);
    assert_eq!(ids(&strict.filter_customers(&customers, &below)), ["z", "s"]);
    assert_eq!(ids(&strict.filter_customers(&customers, &at_most)), ["z", "s"]);
    assert_eq!(ids(&strict.filter_customers(&idle, &no_visits)), ["i"]);

    // The policies only diverge when zero would fail the bound.
    let above = vec![parse_condition("totalSpend >= 5").unwrap()];
    assert_eq!(ids(&lenient.filter_customers(&customers, &above)), ["z", "s", "b"]);
    assert_eq!(ids(&strict.filter_customers(&customers, &above)), ["s", "b"]);
}

#[test]
fn empty_operator_always_passes() {
    for (value, threshold) in [(1.0, 2.0), (2.0, 1.0), (-7.5, 0.0)] {
        assert!(evaluate_condition(value, ComparisonOperator::from_symbol(""), threshold));
    }
}

#[test]
fn filtering_is_idempotent() {
    let customers = demo_customers();
    let before = customers.clone();
    let conditions = vec![
        parse_condition("totalSpend >= 450").unwrap(),
        parse_condition("and lastVisitDate < 2").unwrap(),
    ];
    let first = ids(&filter_customers(&customers, &conditions));
    let second = ids(&filter_customers(&customers, &conditions));
    assert_eq!(first, second);
    // Alice 500/1, David 800/0.5, Eve 600/1.5, Frank 1000/0.2, Ivy 700/1
    assert_eq!(first, ["1", "4", "5", "6", "9"]);
    assert_eq!(customers, before);
}

#[test]
fn edited_condition_list_drives_filter() {
    let customers = demo_customers();
    let mut list = ConditionList::new();
    let spend = list.add();
    let visits = list.add();

    // Incomplete conditions are no-ops.
    assert_eq!(filter_customers(&customers, list.as_slice()).len(), 10);

    list.update(spend, ConditionUpdate::field(CustomerField::TotalSpend)).unwrap();
    list.update(spend, ConditionUpdate::operator(ComparisonOperator::LessThan)).unwrap();
    list.update(spend, ConditionUpdate::value("400")).unwrap();
    list.update(visits, ConditionUpdate::field(CustomerField::Visits)).unwrap();
    list.update(visits, ConditionUpdate::operator(ComparisonOperator::GreaterThan)).unwrap();
    list.update(visits, ConditionUpdate::value("5")).unwrap();

    // Bob 200/5, Charlie 300/8, Grace 350/6, Jake 150/3 under 400; visits > 5 keeps Charlie, Grace
    assert_eq!(ids(&filter_customers(&customers, list.as_slice())), ["3", "7"]);

    list.remove(spend);
    assert_eq!(filter_customers(&customers, list.as_slice()).len(), 8);
}
