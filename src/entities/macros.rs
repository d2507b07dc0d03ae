//! Macros for declaring output shapes
//!
//! An output shape is a plain struct whose fields are listed once, in order,
//! together with their canonical JSON names. The macro generates both the
//! struct and its static field registry.

/// Declare an output shape with automatic [`Shape`](crate::core::shaping::Shape) implementation
///
/// Each field is written as `rust_name: Type => "jsonName"`. The JSON name is
/// used for serialization and as the canonical name in shaped records.
///
/// # Example
///
/// ```rust,ignore
/// use course_library::prelude::*;
///
/// impl_shape!(
///     ShipDto,
///     "ShipDto",
///     {
///         id: Uuid => "id",
///         home_port: String => "homePort",
///     }
/// );
///
/// let record = shape(&ship_dto, Some("homeport"))?;
/// // {"homePort": "Tortuga"}
/// ```
#[macro_export]
macro_rules! impl_shape {
    (
        $type:ident,
        $shape_name:expr,
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty => $json_name:literal ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            $(
                $(#[$field_meta])*
                #[serde(rename = $json_name)]
                pub $field : $field_type
            ),*
        }

        impl $crate::core::shaping::Shape for $type {
            const SHAPE_NAME: &'static str = $shape_name;

            fn fields() -> &'static [$crate::core::shaping::FieldDescriptor<Self>] {
                const FIELDS: &[$crate::core::shaping::FieldDescriptor<$type>] = &[
                    $(
                        $crate::core::shaping::FieldDescriptor {
                            name: $json_name,
                            read: |source: &$type| $crate::core::shaping::to_field_value(&source.$field),
                        }
                    ),*
                ];
                FIELDS
            }
        }
    };
}
