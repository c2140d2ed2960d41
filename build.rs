use entities::ENTITIES;
use std::io::Write;
use std::{env, path::PathBuf};

fn main() {
    let out_dir: PathBuf = env::var("OUT_DIR").unwrap().parse().unwrap();

    // entity::find is handed just the inner entity name, like "amp" for
    // "&amp;"; we only match those with a trailing ";".
    //
    // entities::ENTITIES includes many both with and without a trailing ";".
    // Exclude those without. The resolver contract is one scalar value per
    // name, so entities that expand to more than one character (a handful of
    // negated-operator combinations) are excluded too and resolve as unknown.
    //
    // The table isn't sorted; upper- and lower-case variants are interleaved.
    // Sort it for binary search.
    let mut scalar_entities = ENTITIES
        .iter()
        .filter(|e| e.entity.starts_with('&') && e.entity.ends_with(';'))
        .filter_map(|e| {
            let mut chars = e.characters.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some((&e.entity[1..e.entity.len() - 1], c as u32)),
                _ => None,
            }
        })
        .collect::<Vec<_>>();
    scalar_entities.sort_by_key(|&(name, _)| name);
    scalar_entities.dedup_by_key(|&mut (name, _)| name);

    let out = std::fs::File::create(out_dir.join("entitydata.rs")).unwrap();
    let mut bw = std::io::BufWriter::new(out);
    write!(bw, "mod entitydata {{\n").unwrap();
    write!(
        bw,
        "    pub static SCALAR_ENTITIES: &[(&'static str, u32); {}] = &[\n",
        scalar_entities.len()
    )
    .unwrap();
    for (name, cp) in scalar_entities {
        write!(bw, "        ({:?}, {}),\n", name, cp).unwrap();
    }
    write!(bw, "    ];\n").unwrap();
    write!(bw, "}}\n").unwrap();
}
