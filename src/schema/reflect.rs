//! Static type reflection producing [`Schema`] trees.
//!
//! Rust has no open-ended runtime reflection, so payload types describe
//! themselves through the [`Reflect`] trait. Primitives, optionals,
//! sequences, and maps come for free; record types spell out their fields
//! with the object combinators on [`Schema`]:
//!
//! ```rust
//! use apidoc::{Reflect, ReflectCtx, Schema};
//!
//! struct Device {
//!     serial: String,
//!     labels: Vec<String>,
//!     note: Option<String>,
//! }
//!
//! impl Reflect for Device {
//!     fn reflect(ctx: &mut ReflectCtx) -> Schema {
//!         ctx.named::<Self>(|ctx| {
//!             Schema::object()
//!                 .property("serial", ctx.reflect::<String>())
//!                 .property("labels", ctx.reflect::<Vec<String>>())
//!                 .optional_property("note", ctx.reflect::<Option<String>>())
//!         })
//!     }
//! }
//!
//! let json = serde_json::to_value(Device::schema()).unwrap();
//! assert_eq!(json["properties"]["labels"]["type"], "array");
//! assert_eq!(json["required"], serde_json::json!(["labels", "serial"]));
//! ```
//!
//! Fields a type does not want documented are simply not declared; a
//! renamed field is declared under its wire name. `Option<T>` unwraps to
//! `T`'s schema - whether the field itself is required is the caller's
//! choice of `property` vs `optional_property`.
//!
//! Maps reflect as a bare `{type: object}`: a single element schema cannot
//! describe heterogeneous values, so no per-key detail is invented.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use super::Schema;

/// A type that can describe its own shape as a [`Schema`].
pub trait Reflect {
    /// Builds this type's schema within a reflection context.
    fn reflect(ctx: &mut ReflectCtx) -> Schema;

    /// Builds this type's schema in a fresh context.
    fn schema() -> Schema
    where
        Self: Sized,
    {
        Self::reflect(&mut ReflectCtx::new())
    }
}

/// Tracks record types currently being expanded so self-referential types
/// terminate, and collects the schemas such references point at.
#[derive(Debug, Default)]
pub struct ReflectCtx {
    expanding: Vec<&'static str>,
    referenced: BTreeSet<&'static str>,
    components: BTreeMap<String, Schema>,
}

impl ReflectCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reflects `T` within this context.
    pub fn reflect<T: Reflect>(&mut self) -> Schema {
        T::reflect(self)
    }

    /// Expands a named record type, substituting a `$ref` node when the same
    /// type is already on the expansion stack.
    ///
    /// Completed schemas that were the target of such a reference are kept
    /// so the rendered document can publish them under `components.schemas`,
    /// making the reference resolvable.
    pub fn named<T: ?Sized>(&mut self, build: impl FnOnce(&mut Self) -> Schema) -> Schema {
        let full = std::any::type_name::<T>();
        if self.expanding.contains(&full) {
            self.referenced.insert(full);
            return Schema::reference(format!("#/components/schemas/{}", short_name(full)));
        }
        self.expanding.push(full);
        let schema = build(self);
        self.expanding.pop();
        if self.referenced.contains(&full) {
            self.components
                .entry(short_name(full).to_string())
                .or_insert_with(|| schema.clone());
        }
        schema
    }

    /// Drains the component schemas accumulated so far.
    pub fn take_components(&mut self) -> BTreeMap<String, Schema> {
        std::mem::take(&mut self.components)
    }
}

/// Last path segment of a type name, generics stripped.
fn short_name(full: &str) -> &str {
    let head = full.split('<').next().unwrap_or(full);
    head.rsplit("::").next().unwrap_or(head)
}

impl Reflect for String {
    fn reflect(_: &mut ReflectCtx) -> Schema {
        Schema::string()
    }
}

impl Reflect for &str {
    fn reflect(_: &mut ReflectCtx) -> Schema {
        Schema::string()
    }
}

impl Reflect for char {
    fn reflect(_: &mut ReflectCtx) -> Schema {
        Schema::string()
    }
}

impl Reflect for bool {
    fn reflect(_: &mut ReflectCtx) -> Schema {
        Schema::boolean()
    }
}

macro_rules! reflect_as_integer {
    ($($ty:ty),*) => {
        $(impl Reflect for $ty {
            fn reflect(_: &mut ReflectCtx) -> Schema {
                Schema::integer()
            }
        })*
    };
}

reflect_as_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! reflect_as_number {
    ($($ty:ty),*) => {
        $(impl Reflect for $ty {
            fn reflect(_: &mut ReflectCtx) -> Schema {
                Schema::number()
            }
        })*
    };
}

reflect_as_number!(f32, f64);

/// Optionality wrappers unwrap one level; requiredness is decided where the
/// field is declared, not by the wrapper.
impl<T: Reflect> Reflect for Option<T> {
    fn reflect(ctx: &mut ReflectCtx) -> Schema {
        T::reflect(ctx)
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn reflect(ctx: &mut ReflectCtx) -> Schema {
        T::reflect(ctx)
    }
}

impl<T: Reflect> Reflect for Arc<T> {
    fn reflect(ctx: &mut ReflectCtx) -> Schema {
        T::reflect(ctx)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(ctx: &mut ReflectCtx) -> Schema {
        Schema::array(T::reflect(ctx))
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect(ctx: &mut ReflectCtx) -> Schema {
        Schema::array(T::reflect(ctx))
    }
}

impl<K, V, S> Reflect for HashMap<K, V, S> {
    fn reflect(_: &mut ReflectCtx) -> Schema {
        Schema::object()
    }
}

impl<K, V> Reflect for BTreeMap<K, V> {
    fn reflect(_: &mut ReflectCtx) -> Schema {
        Schema::object()
    }
}

/// The empty-body placeholder.
impl Reflect for () {
    fn reflect(_: &mut ReflectCtx) -> Schema {
        Schema::object()
    }
}

/// Free-form JSON degrades to a generic object.
impl Reflect for serde_json::Value {
    fn reflect(_: &mut ReflectCtx) -> Schema {
        Schema::object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[allow(dead_code)]
    struct Track {
        title: String,
        seconds: u32,
        rating: Option<f64>,
    }

    impl Reflect for Track {
        fn reflect(ctx: &mut ReflectCtx) -> Schema {
            ctx.named::<Self>(|ctx| {
                Schema::object()
                    .property("title", ctx.reflect::<String>().with_description("Display title"))
                    .property("seconds", ctx.reflect::<u32>())
                    .optional_property("rating", ctx.reflect::<Option<f64>>())
            })
        }
    }

    #[allow(dead_code)]
    struct Category {
        name: String,
        children: Vec<Category>,
    }

    impl Reflect for Category {
        fn reflect(ctx: &mut ReflectCtx) -> Schema {
            ctx.named::<Self>(|ctx| {
                Schema::object()
                    .property("name", ctx.reflect::<String>())
                    .property("children", ctx.reflect::<Vec<Category>>())
            })
        }
    }

    #[test]
    fn test_primitive_table() {
        assert_eq!(serde_json::to_value(String::schema()).unwrap()["type"], "string");
        assert_eq!(serde_json::to_value(char::schema()).unwrap()["type"], "string");
        assert_eq!(serde_json::to_value(i64::schema()).unwrap()["type"], "integer");
        assert_eq!(serde_json::to_value(u8::schema()).unwrap()["type"], "integer");
        assert_eq!(serde_json::to_value(f32::schema()).unwrap()["type"], "number");
        assert_eq!(serde_json::to_value(bool::schema()).unwrap()["type"], "boolean");
    }

    #[test]
    fn test_array_of_primitive() {
        let json = serde_json::to_value(Vec::<u16>::schema()).unwrap();
        assert_eq!(json, json!({"type": "array", "items": {"type": "integer"}}));
    }

    #[test]
    fn test_array_of_record() {
        let json = serde_json::to_value(Vec::<Track>::schema()).unwrap();
        assert_eq!(json["type"], "array");
        assert_eq!(json["items"]["type"], "object");
        assert_eq!(json["items"]["properties"]["title"]["type"], "string");
    }

    #[test]
    fn test_fixed_size_array() {
        let json = serde_json::to_value(<[bool; 4]>::schema()).unwrap();
        assert_eq!(json, json!({"type": "array", "items": {"type": "boolean"}}));
    }

    #[test]
    fn test_option_unwraps_one_level() {
        assert_eq!(Option::<String>::schema(), String::schema());
        assert_eq!(Option::<Vec<u8>>::schema(), Vec::<u8>::schema());
    }

    #[test]
    fn test_pointer_wrappers_unwrap() {
        assert_eq!(Box::<i32>::schema(), i32::schema());
        assert_eq!(Arc::<String>::schema(), String::schema());
    }

    #[test]
    fn test_maps_are_lossy_objects() {
        let json = serde_json::to_value(HashMap::<String, Track>::schema()).unwrap();
        assert_eq!(json, json!({"type": "object"}));
        let json = serde_json::to_value(BTreeMap::<String, u64>::schema()).unwrap();
        assert_eq!(json, json!({"type": "object"}));
    }

    #[test]
    fn test_unit_and_value_placeholders() {
        assert_eq!(serde_json::to_value(<()>::schema()).unwrap(), json!({"type": "object"}));
        assert_eq!(
            serde_json::to_value(serde_json::Value::schema()).unwrap(),
            json!({"type": "object"})
        );
    }

    #[test]
    fn test_record_fields_and_required() {
        let json = serde_json::to_value(Track::schema()).unwrap();
        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["title"]["description"], "Display title");
        assert_eq!(json["properties"]["rating"]["type"], "number");
        // optional field is present in properties but absent from required
        assert_eq!(json["required"], json!(["seconds", "title"]));
    }

    #[test]
    fn test_cycle_substitutes_reference() {
        let mut ctx = ReflectCtx::new();
        let schema = ctx.reflect::<Category>();
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            json["properties"]["children"]["items"]["$ref"],
            "#/components/schemas/Category"
        );
    }

    #[test]
    fn test_cycle_target_is_collected() {
        let mut ctx = ReflectCtx::new();
        ctx.reflect::<Category>();
        let components = ctx.take_components();
        let collected = components.get("Category").expect("cycle target collected");
        let json = serde_json::to_value(collected).unwrap();
        assert_eq!(json["properties"]["name"]["type"], "string");
    }

    #[test]
    fn test_acyclic_types_are_not_collected() {
        let mut ctx = ReflectCtx::new();
        ctx.reflect::<Track>();
        assert!(ctx.take_components().is_empty());
    }
}
