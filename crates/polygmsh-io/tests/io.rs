use anyhow::Result;
use polygmsh_io::{export_geo, parse_geo, to_geo_string, write_geo};
use polygmsh_topology::{LatticeBuilder, validate};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_nanos(),
        Err(_) => 0,
    };
    path.push(format!("polygmsh_{stamp}_{file_name}"));
    path
}

#[test]
fn export_geo_creates_file() -> Result<()> {
    let model = LatticeBuilder::build(2, 2, 2)?;
    let dir = temp_path("nested");
    let path = dir.join("cubes.geo");

    export_geo(&model, &path)?;

    let text = fs::read_to_string(&path)?;
    assert!(text.contains("Volume(8) = {8};"));

    let _ = fs::remove_dir_all(&dir);
    Ok(())
}

#[test]
fn script_round_trips_entity_counts() -> Result<()> {
    for (nx, ny, nz) in [(1, 1, 1), (2, 1, 1), (3, 2, 1), (2, 2, 3)] {
        let model = LatticeBuilder::build(nx, ny, nz)?;
        let script = parse_geo(&to_geo_string(&model))?;
        assert_eq!(script.counts(), model.counts(), "{nx}x{ny}x{nz}");
        assert_eq!(script.line_loops.len(), model.surfaces().len());
        assert_eq!(script.surface_loops.len(), model.volumes().len());
    }
    Ok(())
}

#[test]
fn script_references_keep_their_signs() -> Result<()> {
    let model = LatticeBuilder::build(2, 1, 2)?;
    assert!(validate(&model).is_valid());
    let script = parse_geo(&to_geo_string(&model))?;

    for (index, surface) in model.surfaces().iter().enumerate() {
        let expected: Vec<i64> = surface
            .boundary
            .iter()
            .map(|line| i64::from(line.sign()) * (line.entity().index() as i64 + 1))
            .collect();
        assert_eq!(script.line_loops[&(index as u64 + 1)], expected);
    }

    for (index, volume) in model.volumes().iter().enumerate() {
        let expected: Vec<i64> = volume
            .boundary
            .iter()
            .map(|surface| i64::from(surface.sign()) * (surface.entity().index() as i64 + 1))
            .collect();
        assert_eq!(script.surface_loops[&(index as u64 + 1)], expected);
    }
    Ok(())
}

#[test]
fn every_interior_surface_appears_with_both_signs() -> Result<()> {
    let model = LatticeBuilder::build(3, 1, 1)?;
    let script = parse_geo(&to_geo_string(&model))?;

    let mut positive = 0;
    let mut negative = 0;
    for refs in script.surface_loops.values() {
        for &tag in refs {
            let id = model
                .surface_ids()
                .nth(tag.unsigned_abs() as usize - 1)
                .expect("surface tag in range");
            if !model.is_on_hull(id) {
                if tag > 0 {
                    positive += 1;
                } else {
                    negative += 1;
                }
            }
        }
    }
    assert_eq!(positive, 2);
    assert_eq!(negative, 2);
    Ok(())
}

#[test]
fn write_geo_matches_string_rendering() -> Result<()> {
    let model = LatticeBuilder::build(1, 2, 1)?;
    let mut buffer = Vec::new();
    write_geo(&model, &mut buffer)?;
    assert_eq!(String::from_utf8(buffer)?, to_geo_string(&model));
    Ok(())
}
