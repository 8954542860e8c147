use crate::accessor::{self, accessor};
use crate::data::*;
use crate::*;
use serde_json::json;

#[test]
fn project_aligns_results_with_input_indices() {
    let rows = vec![json!(["a", 1]), json!(["b", "2"]), json!(["c", null])];
    let names = project(&rows, &accessor::first());
    let values = project(&rows, &accessor::second());
    assert_eq!(names, ["a", "b", "c"].map(Scalar::from).to_vec());
    assert_eq!(values[0], Scalar::Number(1.0));
    assert_eq!(values[1], Scalar::Text("2".into()));
    assert!(values[2].is_missing());
}

#[test]
fn accessors_receive_the_record_index() {
    let rows = vec![json!({"v": 3}), json!({"v": 4})];
    let idx = project(&rows, &accessor::index());
    assert_eq!(idx, vec![Scalar::Number(0.0), Scalar::Number(1.0)]);
    let doubled = project(&rows, &accessor(|d: &serde_json::Value, i| {
        d["v"].as_f64().unwrap_or_default() * (i + 1) as f64
    }));
    assert_eq!(doubled, vec![3.0, 8.0]);
    let field = project(&rows, &accessor::field("v"));
    assert_eq!(field, vec![Scalar::Number(3.0), Scalar::Number(4.0)]);
}

#[test]
fn tuple_records_expose_first_and_second() {
    let rows = vec![("a", 1.0), ("b", 2.0)];
    assert_eq!(
        project(&rows, &accessor::second()),
        vec![Scalar::Number(1.0), Scalar::Number(2.0)]
    );
}

#[test]
fn numeric_coercion_follows_unary_plus() {
    assert_eq!(Scalar::from("42").as_number(), Some(42.0));
    assert_eq!(Scalar::from(" 1e3 ").as_number(), Some(1000.0));
    assert_eq!(Scalar::from("").as_number(), Some(0.0));
    assert_eq!(Scalar::from("abc").as_number(), None);
    assert_eq!(Scalar::Number(f64::NAN).as_number(), None);
    assert_eq!(Scalar::Missing.as_number(), None);
}

#[test]
fn json_booleans_plot_as_one_and_zero() {
    let yes = Scalar::from_json(&json!(true));
    let no = Scalar::from_json(&json!(false));
    assert_eq!(yes, Scalar::Bool(true));
    assert_eq!(yes.as_number(), Some(1.0));
    assert_eq!(no.as_number(), Some(0.0));
    assert_eq!(yes.to_string(), "true");
    assert_ne!(yes, Scalar::Number(1.0));
    assert_eq!(serde_json::to_value(&no).unwrap(), json!(false));
    assert_eq!(max_number(&[no, yes]), Some(1.0));
}

#[test]
fn temporal_coercion_accepts_dates_years_and_timestamps() {
    let t = Scalar::from("2020-05-01").as_time().unwrap();
    assert_eq!(t.to_rfc3339(), "2020-05-01T00:00:00+00:00");
    let y = Scalar::from("2019").as_time().unwrap();
    assert_eq!(y.to_rfc3339(), "2019-01-01T00:00:00+00:00");
    let ms = Scalar::Number(0.0).as_time().unwrap();
    assert_eq!(ms.timestamp_millis(), 0);
    assert!(Scalar::from("not a date").as_time().is_none());
}

#[test]
fn intern_keeps_first_seen_order_and_dedupes_by_value() {
    let d = intern(["b", "a", "b", "c", "a"].map(Scalar::from));
    let order: Vec<String> = d.iter().map(|s| s.to_string()).collect();
    assert_eq!(order, vec!["b", "a", "c"]);

    let n = intern([Scalar::Number(0.0), Scalar::Number(-0.0), Scalar::Number(1.0)]);
    assert_eq!(n.len(), 2);
}

#[test]
fn explicit_domain_filters_and_extends() {
    let observed = ["a", "x", "b"].map(Scalar::from).to_vec();
    let explicit = ["b", "a"].map(Scalar::from);
    let domain = categorical_domain(Some(&explicit[..]), &observed);
    assert_eq!(indices_in_domain(&observed, &domain), vec![0, 2]);

    let grown = extend_domain(&domain, &observed);
    let order: Vec<String> = grown.iter().map(|s| s.to_string()).collect();
    assert_eq!(order, vec!["b", "a", "x"]);
}

#[test]
fn extents_and_sums_ignore_non_numeric_values() {
    let values = vec![Scalar::from(3.0), Scalar::from("7"), Scalar::from("n/a"), Scalar::Missing];
    assert_eq!(max_number(&values), Some(7.0));
    assert_eq!(sum_numbers(&values), 10.0);
    assert_eq!(numeric_indices(&values), vec![0, 1]);
    assert_eq!(max_number(&[]), None);
}

#[test]
fn group_by_keeps_group_order() {
    let keys = ["s1", "s2", "s1"].map(Scalar::from).to_vec();
    let groups = group_by(&[0, 1, 2], &keys);
    let flat: Vec<(String, Vec<usize>)> =
        groups.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    assert_eq!(
        flat,
        vec![(String::from("s1"), vec![0, 2]), (String::from("s2"), vec![1])]
    );
}

#[test]
fn bisect_center_picks_nearest_with_right_bias() {
    let xs = [0.0, 10.0, 20.0];
    assert_eq!(bisect_center(&xs, 3.0), Some(0));
    assert_eq!(bisect_center(&xs, 5.0), Some(1));
    assert_eq!(bisect_center(&xs, 16.0), Some(2));
    assert_eq!(bisect_center(&xs, -100.0), Some(0));
    assert_eq!(bisect_center(&xs, 100.0), Some(2));
    assert_eq!(bisect_center(&[], 1.0), None);
}
