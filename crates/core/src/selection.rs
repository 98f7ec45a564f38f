/// Single-select toggle: clicking the selected item clears the selection,
/// clicking any other item selects it.
pub fn select<T: PartialEq>(current: Option<T>, clicked: T) -> Option<T> {
    match current {
        Some(current) if current == clicked => None,
        _ => Some(clicked),
    }
}
