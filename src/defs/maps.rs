use glam::Vec2;

use crate::world::grid::{EMPTY, Grid, GridError, Tile};

/// Wall texture id of the built-in data.
pub const WALL: u16 = 1;
/// Floor/ceiling texture id of the built-in data.
pub const FLAT: u16 = 2;

/// A map compiled into the binary: ASCII rows plus a legend.
#[derive(Debug)]
pub struct MapDef {
    pub name: &'static str,
    pub rows: &'static [&'static str],
    pub legend: &'static [(u8, Tile)],
    pub max_wall_height: f32,
    pub spawn: Vec2,
}

impl MapDef {
    /// Tile for one legend byte; unknown bytes are open void.
    pub fn tile_for(&self, b: u8) -> Tile {
        self.legend
            .iter()
            .find(|(c, _)| *c == b)
            .map_or(Tile::new(EMPTY, EMPTY, EMPTY), |&(_, t)| t)
    }

    pub fn build(&self) -> Result<Grid, GridError> {
        let height = self.rows.len();
        let width = self.rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(width * height);
        for row in self.rows {
            cells.extend(row.bytes().map(|b| self.tile_for(b)));
        }
        Grid::new(width, height, self.max_wall_height, cells)
    }
}

/// 10×12 room with a few pillars; floor and ceiling only in the margins.
pub static DEMO: MapDef = MapDef {
    name: "demo",
    rows: &[
        "##########",
        "#cc.....c#",
        "#f......c#",
        "#f.####.c#",
        "#f.#..#..#",
        "#f.#.....#",
        "#k....#..#",
        "#k.#..#..#",
        "#k.####..#",
        "#c.......#",
        "#c.......#",
        "##########",
    ],
    legend: &[
        (b'#', Tile::new(EMPTY, WALL, EMPTY)),
        (b'.', Tile::new(EMPTY, EMPTY, EMPTY)),
        (b'c', Tile::new(FLAT, EMPTY, FLAT)),
        (b'f', Tile::new(EMPTY, EMPTY, FLAT)),
        (b'k', Tile::new(FLAT, EMPTY, EMPTY)),
    ],
    max_wall_height: 800.0,
    spawn: Vec2::new(1.5, 1.5),
};

/// 10×20 hall, fully floored and roofed apart from a courtyard open to
/// the sky inside the central block.
pub static HALL: MapDef = MapDef {
    name: "hall",
    rows: &[
        "##########",
        "#........#",
        "#........#",
        "#..####..#",
        "#..#oo#..#",
        "#..#oo...#",
        "#...oo#..#",
        "#..#oo#..#",
        "#..####..#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "#........#",
        "##########",
    ],
    legend: &[
        (b'#', Tile::new(FLAT, WALL, FLAT)),
        (b'.', Tile::new(FLAT, EMPTY, FLAT)),
        (b'o', Tile::new(EMPTY, EMPTY, FLAT)),
    ],
    max_wall_height: 800.0,
    spawn: Vec2::new(1.5, 1.5),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_rectangular_and_fully_mapped() {
        for def in [&DEMO, &HALL] {
            let width = def.rows[0].len();
            for row in def.rows {
                assert_eq!(row.len(), width, "{}", def.name);
                for b in row.bytes() {
                    assert!(def.legend.iter().any(|(c, _)| *c == b), "{}", def.name);
                }
            }
            let grid = def.build().unwrap();
            assert!(!grid.is_solid_at(def.spawn));
        }
    }

    #[test]
    fn demo_layout() {
        let g = DEMO.build().unwrap();
        assert_eq!((g.width(), g.height()), (10, 12));
        assert_eq!(g.max_wall_height(), 800.0);
        assert_eq!(g.tile(1, 1), Some(&Tile::new(FLAT, EMPTY, FLAT)));
        assert_eq!(g.tile(1, 2), Some(&Tile::new(EMPTY, EMPTY, FLAT)));
        assert_eq!(g.tile(1, 6), Some(&Tile::new(FLAT, EMPTY, EMPTY)));
        assert!(g.is_solid(3, 3));
        // the whole top corridor is open up to the east wall
        assert!((1..9).all(|x| !g.is_solid(x, 1)));
        assert!(g.is_solid(9, 1));
    }

    #[test]
    fn hall_has_an_open_courtyard() {
        let g = HALL.build().unwrap();
        assert_eq!((g.width(), g.height()), (10, 20));
        assert_eq!(g.tile(4, 4).unwrap().ceiling, EMPTY);
        assert_eq!(g.tile(4, 4).unwrap().floor, FLAT);
        assert_eq!(g.tile(2, 2).unwrap().ceiling, FLAT);
    }
}
