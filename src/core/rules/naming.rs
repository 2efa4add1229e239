//! Identifier case checks and conversions shared by the rules

pub fn is_camel_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric())
}

pub fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    // a lone capital or an all-caps name reads as a constant
    let rest: Vec<char> = chars.collect();
    rest.iter().all(|c| c.is_ascii_alphanumeric())
        && (rest.is_empty() || rest.iter().any(|c| c.is_ascii_lowercase()))
}

pub fn is_screaming_snake_case(name: &str) -> bool {
    !name.is_empty()
        && name.starts_with(|c: char| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        && !name.contains("__")
        && !name.ends_with('_')
}

/// Split an identifier on `_`, `-` and lower-to-upper transitions.
fn words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in name.chars() {
        if c == '_' || c == '-' || c == '$' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub fn to_pascal_case(name: &str) -> String {
    words(name).iter().map(|w| capitalize(w)).collect()
}

pub fn to_camel_case(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub fn to_screaming_snake_case(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| w.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_predicates() {
        assert!(is_camel_case("fetchTodos"));
        assert!(!is_camel_case("FetchTodos"));
        assert!(!is_camel_case("fetch_todos"));

        assert!(is_pascal_case("TodoList"));
        assert!(is_pascal_case("A"));
        assert!(!is_pascal_case("todoList"));
        assert!(!is_pascal_case("TODO"));

        assert!(is_screaming_snake_case("ADD_TODO"));
        assert!(is_screaming_snake_case("FETCH_V2"));
        assert!(!is_screaming_snake_case("addTodo"));
        assert!(!is_screaming_snake_case("ADD__TODO"));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(to_pascal_case("todo_list"), "TodoList");
        assert_eq!(to_pascal_case("todoList"), "TodoList");
        assert_eq!(to_camel_case("Fetch_Todos"), "fetchTodos");
        assert_eq!(to_camel_case("FetchTodos"), "fetchTodos");
        assert_eq!(to_screaming_snake_case("addTodo"), "ADD_TODO");
        assert_eq!(to_screaming_snake_case("add-todo"), "ADD_TODO");
    }
}
