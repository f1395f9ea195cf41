//! Product catalog contract.
//!
//! The catalog is static lookup data owned by the product layer; placement
//! only consumes the jewelry type and the per-product tuning constants. A
//! small built-in catalog ships for demos and tests.

use once_cell::sync::Lazy;

/// The closed set of jewelry types the compositor can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JewelryKind {
    Ring,
    Necklace,
    Earring,
}

/// One catalog entry: a jewelry product and its placement tuning constants.
///
/// `base_scale` multiplies the geometric scale; `offset_x` and `offset_y`
/// shift the final position, in pixels. All three apply strictly after the
/// geometric transform, which is what lets the same constants work across
/// different landmark pairs.
#[derive(Debug, Clone)]
pub struct Product {
    id: String,
    kind: JewelryKind,
    base_scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl Product {
    pub fn new(id: impl Into<String>, kind: JewelryKind, base_scale: f32) -> Self {
        Self {
            id: id.into(),
            kind,
            base_scale,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    /// Sets the pixel offsets applied after placement.
    pub fn with_offsets(self, offset_x: f32, offset_y: f32) -> Self {
        Self {
            offset_x,
            offset_y,
            ..self
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn kind(&self) -> JewelryKind {
        self.kind
    }

    #[inline]
    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    #[inline]
    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    #[inline]
    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }
}

/// A lookup table of [`Product`]s.
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn from_products<I: IntoIterator<Item = Product>>(products: I) -> Self {
        Self {
            products: products.into_iter().collect(),
        }
    }

    /// Looks up a product by ID.
    pub fn lookup(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// The built-in demo catalog.
    pub fn builtin() -> &'static Catalog {
        static CATALOG: Lazy<Catalog> = Lazy::new(|| {
            Catalog::from_products([
                Product::new("ring-plain-band", JewelryKind::Ring, 1.0),
                Product::new("ring-signet", JewelryKind::Ring, 1.35),
                Product::new("necklace-pearl-strand", JewelryKind::Necklace, 1.0)
                    .with_offsets(0.0, 12.0),
                Product::new("necklace-pendant", JewelryKind::Necklace, 0.85)
                    .with_offsets(0.0, 20.0),
                Product::new("earring-stud", JewelryKind::Earring, 0.7).with_offsets(3.0, 2.0),
                Product::new("earring-hoop", JewelryKind::Earring, 1.25).with_offsets(5.0, 10.0),
            ])
        });

        &CATALOG
    }
}
