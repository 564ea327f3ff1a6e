//! Integration tests for evaluation, the cell store and the document layer.

use std::collections::HashSet;

use tally::{
    ArithmeticError, CellStore, CellValue, Contents, Document, EvalError, FormatError, Formula,
    StoreError, evaluate,
};

fn no_vars(_: &str) -> Option<i64> {
    None
}

fn names(list: &[&str]) -> HashSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_documented_expressions() {
    assert_eq!(evaluate("6 / 3 + 10 - 20", &no_vars), Ok(-8));
    assert_eq!(evaluate("(3 * 2 / 7) + 8 - 10", &no_vars), Ok(-2));
    assert_eq!(
        evaluate("1/0", &no_vars),
        Err(EvalError::Arithmetic(ArithmeticError::DivisionByZero))
    );
    assert_eq!(
        evaluate("(5 + 6 * 4 / 1", &no_vars),
        Err(EvalError::Format(FormatError::MismatchedParentheses))
    );
    assert!(evaluate(" 9 * (7) )", &no_vars).is_err());
}

#[test]
fn test_cycle_keeps_original_formula() -> anyhow::Result<()> {
    let mut store = CellStore::new();
    store.set_cell_formula("A1", Formula::new("B1+1")?)?;

    let result = store.set_cell_formula("B1", Formula::new("A1+1")?);
    assert!(matches!(result, Err(StoreError::CircularReference { .. })));

    assert_eq!(
        store.get_cell_contents("A1")?,
        Contents::Formula(Formula::new("B1+1")?)
    );
    assert_eq!(store.names_of_all_nonempty_cells(), names(&["A1"]));
    assert_eq!(store.graph().size(), 1);
    assert!(store.direct_dependents("B1")?.contains("A1"));
    Ok(())
}

#[test]
fn test_empty_text_removes_cell() -> anyhow::Result<()> {
    let mut store = CellStore::new();
    store.set_cell_number("A1", 5.0)?;
    store.set_cell_text("A1", "")?;
    assert!(!store.names_of_all_nonempty_cells().contains("A1"));
    Ok(())
}

#[test]
fn test_closure_is_exactly_the_affected_cells() -> anyhow::Result<()> {
    let mut store = CellStore::new();
    store.set_cell_formula("B1", Formula::new("A1")?)?;
    store.set_cell_formula("C1", Formula::new("B1 * 2")?)?;
    store.set_cell_formula("D1", Formula::new("A1 + C1")?)?;
    store.set_cell_formula("E1", Formula::new("F1")?)?;
    store.set_cell_number("G1", 7.0)?;

    let order = store.set_cell_formula("A1", Formula::new("1 + 1")?)?;
    assert_eq!(order, vec!["A1", "B1", "C1", "D1"]);

    let affected: HashSet<String> = order.into_iter().collect();
    assert_eq!(affected, names(&["A1", "B1", "C1", "D1"]));
    Ok(())
}

#[test]
fn test_round_trip_contents() -> anyhow::Result<()> {
    let mut store = CellStore::new();
    let cases = [
        Contents::Number(-3.25),
        Contents::Text("label".to_string()),
        Contents::Formula(Formula::new("X1 * (Y2 - 3)")?),
    ];
    for contents in cases {
        store.set_cell_contents("cell_1", contents.clone())?;
        assert_eq!(store.get_cell_contents("cell_1")?, contents);
    }
    Ok(())
}

#[test]
fn test_document_recomputes_chain() -> anyhow::Result<()> {
    let mut doc = Document::new();
    doc.set_cell_from_input("price", "12")?;
    doc.set_cell_from_input("qty", "3")?;

    // Names without a trailing digit run are cells but not formula variables.
    assert!(doc.set_cell_from_input("sub1", "=price * qty").is_err());
    assert_eq!(doc.get_cell_value("sub1")?, CellValue::Empty);

    doc.set_cell_from_input("P1", "12")?;
    doc.set_cell_from_input("Q1", "3")?;
    doc.set_cell_from_input("T1", "=P1 * Q1")?;
    doc.set_cell_from_input("T2", "=T1 - T1 / 4")?;
    assert_eq!(doc.get_cell_value("T2")?, CellValue::Integer(27));

    let order = doc.set_cell_from_input("Q1", "4")?;
    assert_eq!(order, vec!["Q1", "T1", "T2"]);
    assert_eq!(doc.get_cell_display("T2")?, "36");
    Ok(())
}

#[test]
fn test_document_rejects_bad_edits_without_side_effects() -> anyhow::Result<()> {
    let mut doc = Document::new();
    doc.set_cell_from_input("A1", "=B1")?;
    doc.set_cell_from_input("B1", "10")?;
    doc.mark_saved();

    assert!(doc.set_cell_from_input("B1", "=A1").is_err());
    assert!(doc.set_cell_from_input("B1", "=(1").is_err());
    assert!(doc.set_cell_from_input("1B", "2").is_err());

    assert!(!doc.is_modified());
    assert_eq!(doc.get_cell_value("A1")?, CellValue::Integer(10));
    assert_eq!(doc.get_cell_contents("B1")?, Contents::Number(10.0));
    Ok(())
}
