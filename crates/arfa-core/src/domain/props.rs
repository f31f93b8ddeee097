//! Property bags and the prop classification table.
//!
//! Element properties are applied through [`PropBinding::classify`], the one
//! place that decides whether a property becomes an event listener or an
//! attribute:
//!
//! | key                 | value      | binding                                  |
//! |---------------------|------------|------------------------------------------|
//! | `on*`               | `Handler`  | listener for the lower-cased suffix      |
//! | `className`         | scalar     | `class` attribute                        |
//! | `children`          | any        | ignored (children live on [`Props`])     |
//! | any other           | `Handler`  | ignored                                  |
//! | any other (incl. `on*`) | scalar | attribute with the value's string form   |

use std::fmt;
use std::rc::Rc;

use super::events::DomEvent;
use super::vnode::Node;

/// Event callback attached through an `on*` property.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&DomEvent)>);

impl EventHandler {
    pub fn new(handler: impl Fn(&DomEvent) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    pub fn call(&self, event: &DomEvent) {
        (self.0)(event)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler(..)")
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

/// A single property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Handler(EventHandler),
}

impl PropValue {
    /// String form used when the value is written as an attribute.
    ///
    /// Handlers have no attribute form.
    pub fn attribute_value(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Number(n) => Some(format_number(*n)),
            Self::Bool(b) => Some(b.to_string()),
            Self::Handler(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        Self::Handler(value)
    }
}

/// Render a number the way a browser stringifies it: integral values have
/// no fractional part, and magnitudes from `1e21` up or below `1e-6` switch
/// to exponent form (`1e+21`, `1.5e-7`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else if n == 0.0 {
        // -0 too
        "0".into()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let formatted = format!("{n:e}");
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        }
    } else {
        format!("{n}")
    }
}

/// Ordered property bag plus children.
///
/// Keys keep their first insertion position; setting an existing key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
    children: Box<Node>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder-style event listener, e.g. `.on("onClick", |e| ..)`.
    pub fn on(self, key: impl Into<String>, handler: impl Fn(&DomEvent) + 'static) -> Self {
        self.with(key, EventHandler::new(handler))
    }

    pub fn with_children(mut self, children: impl Into<Node>) -> Self {
        self.children = Box::new(children.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn children(&self) -> &Node {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How one property is applied to a DOM element.
#[derive(Debug, Clone, PartialEq)]
pub enum PropBinding<'a> {
    Listener {
        event: String,
        handler: &'a EventHandler,
    },
    Attribute {
        name: &'a str,
        value: String,
    },
    Ignored,
}

impl<'a> PropBinding<'a> {
    /// Classify a property by name and value. See the module docs for the
    /// full table.
    pub fn classify(key: &'a str, value: &'a PropValue) -> Self {
        if key == "children" {
            return Self::Ignored;
        }

        match value {
            PropValue::Handler(handler) => match key.strip_prefix("on") {
                Some(event) => Self::Listener {
                    event: event.to_lowercase(),
                    handler,
                },
                None => Self::Ignored,
            },
            scalar => {
                let name = if key == "className" { "class" } else { key };
                match scalar.attribute_value() {
                    Some(value) => Self::Attribute { name, value },
                    None => Self::Ignored,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_prefix_with_handler_becomes_listener() {
        let value = PropValue::from(EventHandler::new(|_| {}));
        match PropBinding::classify("onClick", &value) {
            PropBinding::Listener { event, .. } => assert_eq!(event, "click"),
            other => panic!("expected listener, got {other:?}"),
        }
    }

    #[test]
    fn on_prefix_with_scalar_is_plain_attribute() {
        let value = PropValue::from("yes");
        assert_eq!(
            PropBinding::classify("once", &value),
            PropBinding::Attribute {
                name: "once",
                value: "yes".into()
            }
        );
    }

    #[test]
    fn class_name_maps_to_class() {
        let value = PropValue::from("card");
        assert_eq!(
            PropBinding::classify("className", &value),
            PropBinding::Attribute {
                name: "class",
                value: "card".into()
            }
        );
    }

    #[test]
    fn handler_under_plain_key_is_ignored() {
        let value = PropValue::from(EventHandler::new(|_| {}));
        assert_eq!(PropBinding::classify("title", &value), PropBinding::Ignored);
    }

    #[test]
    fn numbers_stringify_like_a_browser() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn large_and_tiny_numbers_use_exponent_form() {
        assert_eq!(format_number(1e15), "1000000000000000");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
    }

    #[test]
    fn setting_existing_key_keeps_position() {
        let props = Props::new()
            .with("id", "a")
            .with("class", "b")
            .with("id", "c");
        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["id", "class"]);
        assert_eq!(props.get_str("id"), Some("c"));
    }
}
