use crate::text::*;

#[test]
fn widest_line_decides_the_width() {
    let m = FixedAdvanceMeasurer::default();
    assert_eq!(m.line_width("3\n30.0", 10.0), 24.0);
    assert_eq!(m.line_width("", 14.0), 0.0);
    assert_eq!(m.line_width("Zürich", 10.0), 36.0);
}
