use std::fs;
use std::path::Path;

use voxmesh_core::{BlockFace, MaybeMaterial};

use crate::{
    BlockData, BlockDefinition, BlockFacesConfig, MaterialData, PackDefinition, Registry,
    RegistryBuilder, RegistryError,
};

/// Load a registry from the provided JSON file path.
pub fn registry_from_file(path: &Path) -> Result<Registry, RegistryError> {
    let data = fs::read_to_string(path)?;
    registry_from_str(&data)
}

/// Load a registry from an in-memory JSON string.
pub fn registry_from_str(input: &str) -> Result<Registry, RegistryError> {
    let pack = crate::load_pack_from_str(input)?;
    registry_from_pack(pack)
}

fn registry_from_pack(pack: PackDefinition) -> Result<Registry, RegistryError> {
    let mut builder = Registry::builder();
    for def in pack.materials {
        builder.add_material(
            def.name,
            MaterialData {
                liquid: def.liquid,
                alpha_test: def.alpha_test,
                texture: def.texture,
                color: def.color,
            },
        )?;
    }
    for def in pack.blocks {
        let data = block_data(&builder, &def)?;
        builder.add_block(def.name, data)?;
    }
    builder.build()
}

fn block_data(builder: &RegistryBuilder, def: &BlockDefinition) -> Result<BlockData, RegistryError> {
    let mut faces = [MaybeMaterial::NONE; 6];
    if let Some(cfg) = def.faces.as_ref() {
        for (face, name) in face_names(cfg) {
            let material = builder.material_by_name(name).ok_or_else(|| {
                RegistryError::UnknownMaterialName {
                    block: def.name.clone(),
                    material: name.to_string(),
                }
            })?;
            faces[face.index()] = MaybeMaterial::some(material);
        }
    }
    for key in &def.hidden {
        for face in faces_for_key(key).ok_or_else(|| RegistryError::UnknownFace {
            block: def.name.clone(),
            face: key.clone(),
        })? {
            faces[face.index()] = MaybeMaterial::NONE;
        }
    }
    Ok(BlockData {
        opaque: def.opaque,
        solid: def.solid.unwrap_or(def.opaque),
        light: def.light,
        faces,
    })
}

/// Resolve the config into `(face, material name)` pairs; later keys win.
fn face_names(cfg: &BlockFacesConfig) -> Vec<(BlockFace, &str)> {
    let mut out = Vec::new();
    let keyed = [
        ("all", cfg.all.as_deref()),
        ("side", cfg.side.as_deref()),
        ("top", cfg.top.as_deref()),
        ("bottom", cfg.bottom.as_deref()),
        ("north", cfg.north.as_deref()),
        ("south", cfg.south.as_deref()),
        ("east", cfg.east.as_deref()),
        ("west", cfg.west.as_deref()),
    ];
    for (key, name) in keyed {
        if let (Some(name), Some(faces)) = (name, faces_for_key(key)) {
            out.extend(faces.iter().map(|&face| (face, name)));
        }
    }
    out
}

fn faces_for_key(key: &str) -> Option<&'static [BlockFace]> {
    const SIDES: [BlockFace; 4] = [
        BlockFace::East,
        BlockFace::West,
        BlockFace::South,
        BlockFace::North,
    ];
    match key {
        "all" => Some(&BlockFace::ALL),
        "side" => Some(&SIDES),
        "top" => Some(&[BlockFace::Up]),
        "bottom" => Some(&[BlockFace::Down]),
        "north" => Some(&[BlockFace::North]),
        "south" => Some(&[BlockFace::South]),
        "east" => Some(&[BlockFace::East]),
        "west" => Some(&[BlockFace::West]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use voxmesh_core::Material;

    use super::*;

    const PACK: &str = r#"
    {
      "materials": [
        { "name": "stone", "texture": 1 },
        { "name": "grass", "texture": 2, "color": [0.4, 0.8, 0.3, 1.0] },
        { "name": "dirt", "texture": 3 },
        { "name": "water", "texture": 4, "liquid": true },
        { "name": "bedrock", "texture": 5 }
      ],
      "blocks": [
        { "name": "air" },
        { "name": "stone", "opaque": true, "faces": { "all": "stone" } },
        { "name": "grass", "opaque": true,
          "faces": { "side": "dirt", "top": "grass", "bottom": "dirt" } },
        { "name": "water", "faces": { "all": "water" } },
        { "name": "bedrock", "opaque": true, "faces": { "all": "bedrock" },
          "hidden": ["bottom"] }
      ]
    }
    "#;

    #[test]
    fn loads_pack_with_per_face_materials() {
        let registry = registry_from_str(PACK).expect("valid pack");
        let grass = registry.id_by_name("grass").unwrap();
        let data = registry.block(grass);
        assert!(data.opaque && data.solid);
        assert_eq!(data.face(BlockFace::Up).material(), Some(Material(1)));
        assert_eq!(data.face(BlockFace::North).material(), Some(Material(2)));
        assert_eq!(data.face(BlockFace::Down).material(), Some(Material(2)));
        assert_eq!(registry.material(Material(1)).color, [0.4, 0.8, 0.3, 1.0]);
    }

    #[test]
    fn hidden_faces_drop_material() {
        let registry = registry_from_str(PACK).unwrap();
        let bedrock = registry.block(registry.id_by_name("bedrock").unwrap());
        assert!(bedrock.face(BlockFace::Down).is_none());
        assert!(!bedrock.face(BlockFace::Up).is_none());
    }

    #[test]
    fn solid_defaults_to_opaque() {
        let registry = registry_from_str(PACK).unwrap();
        assert!(!registry.block(registry.id_by_name("water").unwrap()).solid);
        assert!(!registry.block(0).emits_faces());
    }

    #[test]
    fn unknown_material_name_is_reported() {
        let err = registry_from_str(
            r#"{ "blocks": [ { "name": "stone", "faces": { "all": "granite" } } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownMaterialName { .. }));
    }

    #[test]
    fn unknown_face_key_is_reported() {
        let err = registry_from_str(r#"{ "blocks": [ { "name": "x", "hidden": ["left"] } ] }"#)
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownFace { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            registry_from_str("{ not json"),
            Err(RegistryError::Parse(_))
        ));
    }
}
