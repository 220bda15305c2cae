//! Reference resolution
//!
//! Upstream records reference each other either by bare id or by embedding
//! the populated document. Every aggregator goes through [`Resolver`] so that
//! both forms are normalized the same way and a record excluded from one view
//! is excluded from all of them.

use std::collections::HashMap;

use shared::{
    normalize_id, Categorie, Identified, MouvementStock, PointVente, Produit, Ref, Region, Stock,
};

/// Lookup tables for records that are only referenced by id
#[derive(Debug, Clone, Default)]
pub struct ReferenceDirectory {
    regions: HashMap<String, Region>,
    points_vente: HashMap<String, PointVente>,
    produits: HashMap<String, Produit>,
    categories: HashMap<String, Categorie>,
}

fn index<T: Identified + Clone>(records: &[T]) -> impl Iterator<Item = (String, T)> + '_ {
    records
        .iter()
        .filter_map(|r| r.normalized_id().map(|id| (id.to_string(), r.clone())))
}

impl ReferenceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regions(mut self, regions: &[Region]) -> Self {
        self.regions.extend(index(regions));
        self
    }

    pub fn with_points_vente(mut self, points_vente: &[PointVente]) -> Self {
        self.points_vente.extend(index(points_vente));
        self
    }

    pub fn with_produits(mut self, produits: &[Produit]) -> Self {
        self.produits.extend(index(produits));
        self
    }

    pub fn with_categories(mut self, categories: &[Categorie]) -> Self {
        self.categories.extend(index(categories));
        self
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn point_vente(&self, id: &str) -> Option<&PointVente> {
        self.points_vente.get(id)
    }

    pub fn produit(&self, id: &str) -> Option<&Produit> {
        self.produits.get(id)
    }

    pub fn categorie(&self, id: &str) -> Option<&Categorie> {
        self.categories.get(id)
    }
}

/// A region known by both id and display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionKey<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

fn non_blank(value: &str) -> Option<&str> {
    normalize_id(value)
}

/// Grouping identity of a point of sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointVenteKey<'a> {
    Id(&'a str),
    /// Embedded without an `_id`; grouped by name when it has one
    Unidentified(Option<&'a str>),
}

/// Resolves references on movements and stocks, using the embedded document
/// first and the directory second.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    directory: &'a ReferenceDirectory,
}

impl<'a> Resolver<'a> {
    pub fn new(directory: &'a ReferenceDirectory) -> Self {
        Self { directory }
    }

    pub fn point_vente(&self, reference: &'a Ref<PointVente>) -> Option<&'a PointVente> {
        reference
            .embedded()
            .or_else(|| self.directory.point_vente(reference.id()?))
    }

    /// Grouping key of a movement's point of sale.
    ///
    /// `None` only for central-depot movements and blank bare ids.
    pub fn point_vente_key(&self, movement: &'a MouvementStock) -> Option<PointVenteKey<'a>> {
        let reference = movement.point_vente.as_ref()?;
        if let Some(id) = reference.id() {
            return Some(PointVenteKey::Id(id));
        }
        let point_vente = reference.embedded()?;
        Some(PointVenteKey::Unidentified(non_blank(&point_vente.nom)))
    }

    /// Display label of a movement's point of sale: its name, else its id
    pub fn point_vente_label(&self, movement: &'a MouvementStock) -> Option<&'a str> {
        let reference = movement.point_vente.as_ref()?;
        self.point_vente(reference)
            .and_then(|pv| non_blank(&pv.nom))
            .or_else(|| reference.id())
    }

    /// Region identifier of a movement, through its point of sale.
    ///
    /// Needs only the id, whether the region is embedded or a bare id.
    pub fn region_id_of(&self, movement: &'a MouvementStock) -> Option<&'a str> {
        let point_vente = self.point_vente(movement.point_vente.as_ref()?)?;
        point_vente.region.as_ref()?.id()
    }

    /// Region of a movement, through its point of sale.
    ///
    /// `None` for central-depot movements and whenever the region id cannot
    /// be established. A region without a known name is labelled by its id.
    pub fn region_of(&self, movement: &'a MouvementStock) -> Option<RegionKey<'a>> {
        let point_vente = self.point_vente(movement.point_vente.as_ref()?)?;
        self.region_of_point_vente(point_vente)
    }

    pub fn region_of_point_vente(&self, point_vente: &'a PointVente) -> Option<RegionKey<'a>> {
        let reference = point_vente.region.as_ref()?;
        let id = reference.id()?;
        let name = reference
            .embedded()
            .and_then(|region| non_blank(&region.nom))
            .or_else(|| self.directory.region(id).and_then(|r| non_blank(&r.nom)))
            .unwrap_or(id);
        Some(RegionKey { id, name })
    }

    pub fn produit(&self, reference: &'a Ref<Produit>) -> Option<&'a Produit> {
        reference
            .embedded()
            .or_else(|| self.directory.produit(reference.id()?))
    }

    pub fn product_id(&self, reference: Option<&'a Ref<Produit>>) -> Option<&'a str> {
        reference?.id()
    }

    /// Display label of a product: its name, else its id
    pub fn product_label(&self, reference: Option<&'a Ref<Produit>>) -> Option<&'a str> {
        let reference = reference?;
        self.produit(reference)
            .and_then(|p| non_blank(&p.nom))
            .or_else(|| reference.id())
    }

    /// Category name of the product held by a stock line
    pub fn category_name(&self, stock: &'a Stock) -> Option<&'a str> {
        let produit = self.produit(stock.produit.as_ref()?)?;
        let reference = produit.categorie.as_ref()?;
        reference
            .embedded()
            .and_then(|c| non_blank(&c.nom))
            .or_else(|| {
                let id = reference.id()?;
                self.directory.categorie(id).and_then(|c| non_blank(&c.nom))
            })
    }
}
