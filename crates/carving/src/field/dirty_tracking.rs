//! Dirty tile tracking so hosts can refresh only carved regions

use super::MaterialField;

/// Tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl MaterialField {
    /// Mark the tile containing a cell as modified
    #[inline]
    pub(crate) fn mark_dirty(&mut self, x: u32, y: u32) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        self.dirty_tiles.insert(TileCoord {
            x: x / self.tile_size,
            y: y / self.tile_size,
        });
    }

    /// Mark every tile as modified
    pub(crate) fn mark_all_dirty(&mut self) {
        for ty in 0..self.tiles_y {
            for tx in 0..self.tiles_x {
                self.dirty_tiles.insert(TileCoord { x: tx, y: ty });
            }
        }
    }

    /// Get all dirty tiles and clear the dirty set, sorted row by row
    pub fn take_dirty_tiles(&mut self) -> Vec<TileCoord> {
        let mut tiles: Vec<_> = self.dirty_tiles.drain().collect();
        tiles.sort_by_key(|t| (t.y, t.x));
        tiles
    }

    /// Check if any tiles are dirty
    #[inline]
    pub fn has_dirty_tiles(&self) -> bool {
        !self.dirty_tiles.is_empty()
    }

    /// Get the number of dirty tiles
    #[inline]
    pub fn dirty_tile_count(&self) -> usize {
        self.dirty_tiles.len()
    }

    /// Tile edge length in cells
    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Get tile bounds (x, y, width, height) in cell coordinates
    pub fn tile_bounds(&self, coord: TileCoord) -> (u32, u32, u32, u32) {
        let start_x = coord.x * self.tile_size;
        let start_y = coord.y * self.tile_size;

        let width = self.tile_size.min(self.width().saturating_sub(start_x));
        let height = self.tile_size.min(self.height().saturating_sub(start_y));

        (start_x, start_y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use crate::field::MaterialField;
    use crate::silhouette::Silhouette;

    use super::TileCoord;

    fn field(width: u32, height: u32) -> MaterialField {
        MaterialField::fully_covered(Silhouette::full(width, height).unwrap())
    }

    #[test]
    fn test_removal_marks_tile() {
        let mut field = field(200, 200);
        let size = field.tile_size();

        field.apply_removal(0, 0, 0.1);
        field.apply_removal(size as i64 + 1, size as i64 + 1, 0.1);
        assert_eq!(field.dirty_tile_count(), 2);

        let tiles = field.take_dirty_tiles();
        assert_eq!(tiles, vec![TileCoord { x: 0, y: 0 }, TileCoord { x: 1, y: 1 }]);
        assert!(!field.has_dirty_tiles());
    }

    #[test]
    fn test_reset_marks_everything() {
        let mut field = field(150, 70);
        let size = field.tile_size();
        field.reset();
        let expected = 150u32.div_ceil(size) * 70u32.div_ceil(size);
        assert_eq!(field.dirty_tile_count(), expected as usize);
    }

    #[test]
    fn test_edge_tile_bounds() {
        let field = field(150, 150);
        let size = field.tile_size();
        let last = 150 / size;
        let (x, y, w, h) = field.tile_bounds(TileCoord { x: last, y: last });
        assert_eq!((x, y), (last * size, last * size));
        assert_eq!((w, h), (150 - last * size, 150 - last * size));
        assert_eq!(field.tile_bounds(TileCoord { x: 0, y: 0 }), (0, 0, size, size));
    }
}
