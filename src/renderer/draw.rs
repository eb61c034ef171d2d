//! Frame draw list: vertices grouped by the texture they sample

use super::vertex::Vertex;

/// Texture a batch is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Map tileset image
    Tiles,
    /// Player sprite atlas
    Sprites,
    /// 1x1 white texel for flat colors
    Solid,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 3] = [TextureSlot::Tiles, TextureSlot::Sprites, TextureSlot::Solid];

    pub fn index(self) -> usize {
        match self {
            TextureSlot::Tiles => 0,
            TextureSlot::Sprites => 1,
            TextureSlot::Solid => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub slot: TextureSlot,
    pub vertices: Vec<Vertex>,
}

/// Batches in draw order. Consecutive draws with the same texture share a batch.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    batches: Vec<Batch>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertex sink for the next draw with `slot`
    pub fn batch(&mut self, slot: TextureSlot) -> &mut Vec<Vertex> {
        let start_new = self.batches.last().is_none_or(|b| b.slot != slot);
        if start_new {
            self.batches.push(Batch {
                slot,
                vertices: Vec::new(),
            });
        }
        let last = self.batches.len() - 1;
        &mut self.batches[last].vertices
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }

    /// All vertices of one texture, in draw order
    pub fn vertices_for(&self, slot: TextureSlot) -> impl Iterator<Item = &Vertex> {
        self.batches
            .iter()
            .filter(move |b| b.slot == slot)
            .flat_map(|b| b.vertices.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_slot_merges() {
        let mut list = DrawList::new();
        list.batch(TextureSlot::Tiles).push(Vertex::solid(0.0, 0.0, [1.0; 4]));
        list.batch(TextureSlot::Tiles).push(Vertex::solid(1.0, 0.0, [1.0; 4]));
        list.batch(TextureSlot::Sprites).push(Vertex::solid(2.0, 0.0, [1.0; 4]));
        list.batch(TextureSlot::Tiles).push(Vertex::solid(3.0, 0.0, [1.0; 4]));

        let slots: Vec<_> = list.batches().iter().map(|b| b.slot).collect();
        assert_eq!(
            slots,
            vec![TextureSlot::Tiles, TextureSlot::Sprites, TextureSlot::Tiles]
        );
        assert_eq!(list.batches()[0].vertices.len(), 2);
        assert_eq!(list.vertex_count(), 4);
        assert_eq!(list.vertices_for(TextureSlot::Tiles).count(), 3);
    }
}
