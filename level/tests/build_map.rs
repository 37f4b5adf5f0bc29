use bevy_math::{Vec2, Vec3};

use bspkit_bsp::{
  BrushModel, BspFile, Contents, Edge, Face, Leaf, LumpData, LumpType, Node, Plane, PlaneType, QuoteMode, SurfaceEdge,
  TextureDirectory, TextureFlags, TextureInfo, TexturePixels, TextureRecord, Vertex, LUMP_COUNT,
};
use bspkit_level::{BuildConfig, Level};

fn encode<T: LumpData>(records: &[T]) -> Box<[u8]> {
  let mut bytes = Vec::new();
  for record in records {
    record.write(&mut bytes).unwrap();
  }
  bytes.into_boxed_slice()
}

fn brick() -> TextureRecord {
  let mut palette = vec![[0u8, 0, 0]; 256];
  palette[1] = [200, 80, 40];
  palette[255] = [0, 0, 255];
  TextureRecord {
    name: "{brick".to_string(),
    width: 16,
    height: 16,
    pixels: Some(TexturePixels {
      mips: [
        vec![1u8; 256].into_boxed_slice(),
        vec![1u8; 64].into_boxed_slice(),
        vec![255u8; 16].into_boxed_slice(),
        vec![1u8; 4].into_boxed_slice(),
      ],
      palette: palette.into_boxed_slice(),
    }),
  }
}

fn leaf(contents: Contents) -> Leaf {
  Leaf {
    contents,
    visibility_offset: None,
    mins: [-64, -64, -64],
    maxs: [64, 64, 64],
    first_mark_surface: 0,
    mark_surfaces_count: 0,
    ambient_levels: [0; 4],
  }
}

/// One lit 64x64 floor quad, split by a single node into an empty and a solid leaf.
fn floor_map() -> BspFile {
  let mut lumps: [Box<[u8]>; LUMP_COUNT] = Default::default();
  lumps[LumpType::Entities as usize] = b"{\n\"classname\" \"worldspawn\"\n\"wad\" \"halflife.wad\"\n}\n\
{\n\"classname\" \"func_door\"\n\"model\" \"*1\"\n\"targetname\" \"door1\"\n}\n\0"
    .to_vec()
    .into_boxed_slice();
  lumps[LumpType::Planes as usize] = encode(&[Plane { normal: Vec3::Z, dist: 0.0, plane_type: PlaneType::Z }]);
  lumps[LumpType::Textures as usize] =
    TextureDirectory::new(vec![brick(), TextureRecord::external("sky", 256, 256)]).to_bytes();
  lumps[LumpType::Vertices as usize] = encode(&[
    Vertex { position: Vec3::new(0.0, 0.0, 0.0) },
    Vertex { position: Vec3::new(64.0, 0.0, 0.0) },
    Vertex { position: Vec3::new(64.0, 64.0, 0.0) },
    Vertex { position: Vec3::new(0.0, 64.0, 0.0) },
  ]);
  lumps[LumpType::Nodes as usize] = encode(&[Node { plane_index: 0, children: [!0, !1], ..Default::default() }]);
  lumps[LumpType::TextureInfo as usize] = encode(&[TextureInfo {
    s_axis: Vec3::X,
    s_shift: 0.0,
    t_axis: Vec3::Y,
    t_shift: 0.0,
    texture_index: 0,
    flags: TextureFlags::empty(),
  }]);
  lumps[LumpType::Faces as usize] = encode(&[Face { first_edge: 0, edges_count: 4, light_offset: Some(0), ..Default::default() }]);
  // 64 units span 5x5 luxels.
  lumps[LumpType::Lighting as usize] = vec![96u8; 5 * 5 * 3].into_boxed_slice();
  lumps[LumpType::Leaves as usize] = encode(&[leaf(Contents::Empty), leaf(Contents::Solid)]);
  lumps[LumpType::Edges as usize] = encode(&[
    Edge { vertex_index: [0, 0] },
    Edge { vertex_index: [0, 1] },
    Edge { vertex_index: [1, 2] },
    Edge { vertex_index: [2, 3] },
    Edge { vertex_index: [3, 0] },
  ]);
  lumps[LumpType::SurfaceEdges as usize] =
    encode(&[SurfaceEdge { index: 1 }, SurfaceEdge { index: 2 }, SurfaceEdge { index: 3 }, SurfaceEdge { index: 4 }]);
  lumps[LumpType::Models as usize] = encode(&[BrushModel {
    min: Vec3::ZERO,
    max: Vec3::new(64.0, 64.0, 0.0),
    origin: Vec3::ZERO,
    head_nodes: [0; 4],
    visible_leaves: 1,
    first_face: 0,
    faces_count: 1,
  }]);
  BspFile::from_lumps(lumps)
}

#[test]
fn saved_map_loads_and_builds() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("floor.bsp");
  floor_map().save(&path).unwrap();

  let map = BspFile::open(&path).unwrap();
  assert_eq!(map, floor_map());

  let entities = map.entities(QuoteMode::Legacy).unwrap();
  assert_eq!(entities.world_spawn().and_then(|world| world.get("wad")), Some("halflife.wad"));
  assert_eq!(entities.by_model(1).count(), 1);
  assert_eq!(entities.by_targetname("door1").next().and_then(|door| door.classname()), Some("func_door"));

  assert_eq!(map.leaf_at(0, Vec3::new(8.0, 8.0, 16.0)), Ok(0));
  assert_eq!(map.leaf_at(0, Vec3::new(8.0, 8.0, -16.0)), Ok(1));

  let level = Level::build(&map, &BuildConfig::default()).unwrap();
  let world = level.world().unwrap();
  assert_eq!(world.indices[&0], vec![0, 1, 2, 0, 2, 3]);
  assert_eq!(level.vertices.len(), 4);
  assert_eq!(level.vertices[2].uv, Vec2::new(4.0, 4.0));
  assert_eq!(level.lightmap.width(), 512);
  assert_eq!(level.lightmap.used_area(), 25);
  assert!(level.skipped_faces.is_empty());
  assert_eq!(level.textures.len(), 2);
  assert!(level.textures[1].is_external());

  let lightmap_path = dir.path().join("lightmap.png");
  level.save_lightmap(&lightmap_path).unwrap();
  assert!(lightmap_path.metadata().unwrap().len() > 0);

  let texture_path = dir.path().join("brick.png");
  level.save_texture(0, &texture_path).unwrap();
  assert!(texture_path.exists());
  assert!(level.save_texture(1, dir.path().join("sky.png")).is_err());
}

#[test]
fn replaced_textures_survive_a_rewrite() {
  let mut map = floor_map();
  let mut textures = map.textures().unwrap();
  assert_eq!(textures.find("{BRICK"), Some(0));

  let rgba = textures.get(0).unwrap().to_rgba(2).unwrap();
  assert_eq!(&rgba[..4], &[0, 0, 0, 0]);

  textures.replace(0, TextureRecord::external("{brick", 16, 16));
  map.replace_textures(&textures);

  let mut bytes = Vec::new();
  map.write(&mut bytes).unwrap();
  let reloaded = BspFile::read(std::io::Cursor::new(bytes)).unwrap();
  assert!(reloaded.textures().unwrap().get(0).unwrap().is_external());

  let level = Level::build(&reloaded, &BuildConfig::default()).unwrap();
  assert!(level.save_texture(0, tempfile::tempdir().unwrap().path().join("brick.png")).is_err());
}
