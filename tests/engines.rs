use std::rc::Rc;

use statcore::interpreter::{
    coercion::{PreservePolicy, coerce, coerce_vector},
    evaluator::{options::Options, warning::WarningKind},
    matcher::{MatchedSlot, PrepareArguments, Signature, match_arguments},
    node::Formals,
    reduction::{ReduceOp, reduce},
    value::{Kind, Logical, NA_INTEGER, NA_REAL, Value, Vector, VectorData, is_na_real},
};

fn signature(names: &[Option<&str>]) -> Signature {
    let mut signature = Signature::default();
    for name in names {
        signature.push(name.map(str::to_string), true);
    }
    signature
}

#[test]
fn dots_collect_positional_leftovers() {
    let formals = Formals::from_names(&["a", "b", "..."]);
    let permutation = match_arguments(&formals, &signature(&[Some("b"), None, None]), true, |i| i.to_string()).unwrap();
    assert_eq!(permutation.slots,
               vec![MatchedSlot::Actual(1), MatchedSlot::Actual(0), MatchedSlot::Varargs(vec![2])]);
}

#[test]
fn cached_and_generic_sites_agree() {
    let formals = Rc::new(Formals::from_names(&["x", "y", "z", "..."]));
    let shapes = [signature(&[None, None]),
                  signature(&[Some("z"), None]),
                  signature(&[Some("y"), Some("x")]),
                  signature(&[None, Some("extra"), None]),
                  signature(&[Some("z")]),
                  signature(&[None, None, None, None]),
                  signature(&[None, None])];
    let options = Options::default();
    let mut site = PrepareArguments::default();

    for (i, shape) in shapes.iter().enumerate() {
        let prepared = site.prepare(&formals, shape, &options, |i| i.to_string()).unwrap();
        let fresh = match_arguments(&formals, shape, true, |i| i.to_string()).unwrap();
        assert_eq!(*prepared, fresh, "shape {i}");
    }
    assert!(site.is_generic());
}

#[test]
fn cache_holds_four_shapes_then_goes_generic() {
    let formals = Rc::new(Formals::from_names(&["a", "b", "c", "d", "e"]));
    let options = Options::default();
    let mut site = PrepareArguments::default();
    for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
        site.prepare(&formals, &signature(&[Some(name)]), &options, |i| i.to_string()).unwrap();
        assert_eq!(site.cached_shapes(), i + 1);
    }
    site.prepare(&formals, &signature(&[Some("a")]), &options, |i| i.to_string()).unwrap();
    assert_eq!(site.cached_shapes(), 4);
    site.prepare(&formals, &signature(&[Some("e")]), &options, |i| i.to_string()).unwrap();
    assert!(site.is_generic());
}

#[test]
fn cache_distinguishes_callees() {
    let first = Rc::new(Formals::from_names(&["a", "b"]));
    let second = Rc::new(Formals::from_names(&["b", "a"]));
    let options = Options::default();
    let mut site = PrepareArguments::default();
    let shape = signature(&[None, None]);
    site.prepare(&first, &shape, &options, |i| i.to_string()).unwrap();
    site.prepare(&second, &shape, &options, |i| i.to_string()).unwrap();
    assert_eq!(site.cached_shapes(), 2);
}

#[test]
fn failed_matches_are_not_cached() {
    let formals = Rc::new(Formals::from_names(&["a"]));
    let options = Options::default();
    let mut site = PrepareArguments::default();
    let result = site.prepare(&formals, &signature(&[None, None]), &options, |i| i.to_string());
    assert_eq!(result.unwrap_err().id(), "UNUSED_ARGUMENT");
    assert_eq!(site.cached_shapes(), 0);
}

#[test]
fn strided_and_dense_reductions_agree() {
    let strided = Vector::integer_sequence(-3, 2, 8).unwrap();
    let dense = Vector::new(strided.data().to_dense());
    for op in [ReduceOp::Sum, ReduceOp::Prod, ReduceOp::Min, ReduceOp::Max] {
        let a = reduce(&strided, op, false, false, &mut Vec::new()).unwrap();
        let b = reduce(&dense, op, false, false, &mut Vec::new()).unwrap();
        assert!(a.identical(&b), "{op:?}");
    }

    let strided = Vector::double_sequence(0.5, -1.0, 5);
    let dense = Vector::new(strided.data().to_dense());
    for op in [ReduceOp::Sum, ReduceOp::Prod, ReduceOp::Min, ReduceOp::Max] {
        let a = reduce(&strided, op, true, true, &mut Vec::new()).unwrap();
        let b = reduce(&dense, op, true, true, &mut Vec::new()).unwrap();
        assert!(a.identical(&b), "{op:?}");
    }
}

#[test]
fn na_rm_skips_missing_values() {
    let v = Vector::new(VectorData::Double(vec![1.0, NA_REAL, 3.0]));
    let mut warnings = Vec::new();
    let total = reduce(&v, ReduceOp::Sum, true, false, &mut warnings).unwrap();
    assert!(matches!(total.data(), VectorData::Double(d) if d == &[4.0]));
    assert!(warnings.is_empty());

    let total = reduce(&v, ReduceOp::Sum, false, false, &mut warnings).unwrap();
    assert!(total.data().has_na());
}

#[test]
fn nan_propagates_without_becoming_na() {
    let v = Vector::new(VectorData::Double(vec![f64::NAN, 1.0]));
    let total = reduce(&v, ReduceOp::Sum, false, false, &mut Vec::new()).unwrap();
    assert!(matches!(total.data(), VectorData::Double(d) if d[0].is_nan() && !is_na_real(d[0])));

    let v = Vector::new(VectorData::Double(vec![f64::NAN, NA_REAL]));
    let min = reduce(&v, ReduceOp::Min, false, false, &mut Vec::new()).unwrap();
    assert!(matches!(min.data(), VectorData::Double(d) if is_na_real(d[0])));
}

#[test]
fn finite_skips_nan_as_well() {
    let v = Vector::new(VectorData::Double(vec![f64::NAN, 2.0, f64::NEG_INFINITY, 5.0]));
    let min = reduce(&v, ReduceOp::Min, false, true, &mut Vec::new()).unwrap();
    assert!(matches!(min.data(), VectorData::Double(d) if d == &[2.0]));
    let total = reduce(&v, ReduceOp::Sum, false, true, &mut Vec::new()).unwrap();
    assert!(matches!(total.data(), VectorData::Double(d) if d == &[7.0]));
}

#[test]
fn finite_is_ignored_for_logical_input() {
    let logical = Vector::new(VectorData::Logical(vec![Logical::True, Logical::Na, Logical::True]));
    let total = reduce(&logical, ReduceOp::Sum, false, true, &mut Vec::new()).unwrap();
    assert!(matches!(total.data(), VectorData::Integer(d) if d == &[NA_INTEGER]));

    let integer = Vector::new(VectorData::Integer(vec![1, NA_INTEGER, 1]));
    let total = reduce(&integer, ReduceOp::Sum, false, true, &mut Vec::new()).unwrap();
    assert!(matches!(total.data(), VectorData::Integer(d) if d == &[2]));
}

#[test]
fn character_extremes_see_missing_values() {
    let v = Vector::new(VectorData::Character(vec![Some("b".to_string()), None, Some("a".to_string())]));
    for op in [ReduceOp::Min, ReduceOp::Max] {
        let kept = reduce(&v, op, false, false, &mut Vec::new()).unwrap();
        assert!(matches!(kept.data(), VectorData::Character(d) if d == &[None::<String>]), "{op:?}");
    }
    let min = reduce(&v, ReduceOp::Min, true, false, &mut Vec::new()).unwrap();
    assert!(matches!(min.data(), VectorData::Character(d) if d == &[Some("a".to_string())]));
}

#[test]
fn results_know_whether_they_are_complete() {
    let strings = |s: &[&str]| Vector::new(VectorData::Character(s.iter().map(|s| Some((*s).to_string())).collect()));
    let mut warnings = Vec::new();
    let partial = coerce_vector(&strings(&["x", "2"]), Kind::Double, PreservePolicy::NONE, &mut warnings).unwrap();
    assert!(!partial.is_complete());
    let whole = coerce_vector(&strings(&["1", "2"]), Kind::Double, PreservePolicy::NONE, &mut warnings).unwrap();
    assert!(whole.is_complete());

    let with_na = Vector::new(VectorData::Double(vec![1.0, NA_REAL]));
    assert!(!reduce(&with_na, ReduceOp::Sum, false, false, &mut warnings).unwrap().is_complete());
    assert!(reduce(&with_na, ReduceOp::Sum, true, false, &mut warnings).unwrap().is_complete());
    let sequence = Vector::integer_sequence(1, 1, 4).unwrap();
    assert!(reduce(&sequence, ReduceOp::Max, false, false, &mut warnings).unwrap().is_complete());
}

#[test]
fn empty_reductions_return_the_start_value() {
    let empty = Vector::empty(Kind::Double);
    let mut warnings = Vec::new();
    let min = reduce(&empty, ReduceOp::Min, true, false, &mut warnings).unwrap();
    assert!(matches!(min.data(), VectorData::Double(d) if d == &[f64::INFINITY]));
    assert_eq!(warnings, vec![WarningKind::NoNonMissing { op:     "min",
                                                          result: "Inf", }]);

    let mut warnings = Vec::new();
    let sum = reduce(&empty, ReduceOp::Sum, true, false, &mut warnings).unwrap();
    assert!(matches!(sum.data(), VectorData::Double(d) if d == &[0.0]));
    assert!(warnings.is_empty());
}

#[test]
fn empty_character_extremes_are_na_with_a_warning() {
    let empty = Vector::empty(Kind::Character);
    let mut warnings = Vec::new();
    let result = reduce(&empty, ReduceOp::Max, false, false, &mut warnings).unwrap();
    assert_eq!(result.kind(), Kind::Character);
    assert!(result.data().has_na());
    assert_eq!(warnings, vec![WarningKind::NoNonMissingCharacter { op: "max" }]);
}

#[test]
fn finite_drops_infinities() {
    let v = Vector::new(VectorData::Double(vec![1.0, f64::INFINITY, 2.0]));
    let max = reduce(&v, ReduceOp::Max, false, true, &mut Vec::new()).unwrap();
    assert!(matches!(max.data(), VectorData::Double(d) if d == &[2.0]));
}

#[test]
fn coercion_is_idempotent() {
    let mut v = Vector::new(VectorData::Character(vec![Some("1".to_string()), None, Some("x".to_string())]));
    v.set_names(Some(vec![Some("a".to_string()), Some("b".to_string()), Some("c".to_string())]));
    let mut warnings = Vec::new();
    let once = coerce_vector(&v, Kind::Integer, PreservePolicy::ALL, &mut warnings).unwrap();
    assert_eq!(warnings, vec![WarningKind::NasIntroducedByCoercion]);

    let mut again_warnings = Vec::new();
    let twice = coerce_vector(&once, Kind::Integer, PreservePolicy::ALL, &mut again_warnings).unwrap();
    assert!(once.identical(&twice));
    assert!(again_warnings.is_empty());
    assert!(matches!(twice.data(), VectorData::Integer(d) if d == &[1, NA_INTEGER, NA_INTEGER]));
}

#[test]
fn preserve_policy_selects_attributes() {
    let mut v = Vector::new(VectorData::Double(vec![1.0, 2.0]));
    v.set_names(Some(vec![Some("a".to_string()), Some("b".to_string())]));
    v.attributes_mut().set("units", Value::character("kg"));

    let bare = coerce_vector(&v, Kind::Integer, PreservePolicy::NONE, &mut Vec::new()).unwrap();
    assert!(bare.names().is_none());
    assert!(bare.attributes().get("units").is_none());

    let named = PreservePolicy { names: true,
                                 ..PreservePolicy::NONE };
    let kept = coerce_vector(&v, Kind::Integer, named, &mut Vec::new()).unwrap();
    assert!(kept.names().is_some());
    assert!(kept.attributes().get("units").is_none());
}

#[test]
fn null_coerces_to_an_empty_vector() {
    let v = coerce(&Value::Null, Kind::Complex, PreservePolicy::NONE, &mut Vec::new()).unwrap();
    assert_eq!(v.kind(), Kind::Complex);
    assert!(v.is_empty());
}

#[test]
fn list_elements_must_be_scalars() {
    let list = Vector::new(VectorData::List(vec![Value::double(1.0),
                                                 VectorData::Double(vec![1.0, 2.0]).into()]));
    let result = coerce_vector(&list, Kind::Double, PreservePolicy::NONE, &mut Vec::new());
    assert_eq!(result.unwrap_err().id(), "LIST_COERCION");
}

#[test]
fn out_of_range_raw_warns_once() {
    let v = Vector::new(VectorData::Integer(vec![-1, 7, 300]));
    let mut warnings = Vec::new();
    let raw = coerce_vector(&v, Kind::Raw, PreservePolicy::NONE, &mut warnings).unwrap();
    assert!(matches!(raw.data(), VectorData::Raw(d) if d == &[0, 7, 0]));
    assert_eq!(warnings, vec![WarningKind::OutOfRangeRaw]);
}
