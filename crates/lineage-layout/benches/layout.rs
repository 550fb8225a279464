use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lineage_core::{
    BuildTreeOptions, LayoutType, Person, Relationship, TreeData, TreeLayoutConfig,
    TreeStyleConfig,
};
use lineage_layout::LayoutEngine;
use std::hint::black_box;
use std::time::Duration;

/// `generations` levels below a root couple; each couple has `fanout` children and every child
/// marries, so the tree grows as `fanout ^ generations`.
fn dynasty(generations: usize, fanout: usize) -> TreeData {
    let mut persons: Vec<Person> = Vec::new();
    let mut relationships: Vec<Relationship> = Vec::new();
    let add = |persons: &mut Vec<Person>| {
        let id = format!("n{}", persons.len());
        persons.push(Person::new(id.clone(), id.clone(), "Bench"));
        id
    };

    let a = add(&mut persons);
    let b = add(&mut persons);
    relationships.push(Relationship::spouse(format!("s{a}"), &a, &b));
    let mut couples = vec![(a, b)];

    for _ in 0..generations {
        let mut next = Vec::new();
        for (a, b) in &couples {
            for _ in 0..fanout {
                let child = add(&mut persons);
                let partner = add(&mut persons);
                relationships.push(Relationship::parent(format!("pa{child}"), a, &child));
                relationships.push(Relationship::parent(format!("pb{child}"), b, &child));
                relationships.push(Relationship::spouse(format!("s{child}"), &child, &partner));
                next.push((child, partner));
            }
        }
        couples = next;
    }

    TreeData {
        persons,
        relationships,
        root_person_id: Some("n0".to_string()),
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree_layout");
    group.measurement_time(Duration::from_secs(10));

    let cases = [("g4_f3", 4usize, 3usize), ("g6_f3", 6, 3), ("g5_f5", 5, 5)];
    for (name, generations, fanout) in cases {
        let data = dynasty(generations, fanout);
        for layout_type in [LayoutType::Descendants, LayoutType::Full] {
            let engine = LayoutEngine::new(
                TreeLayoutConfig {
                    layout_type,
                    show_siblings: true,
                    ..Default::default()
                },
                TreeStyleConfig::default(),
            )
            .unwrap_or_else(|e| panic!("{e}"));
            group.bench_with_input(
                BenchmarkId::new(format!("{layout_type:?}"), name),
                &data,
                |b, data| {
                    b.iter(|| {
                        let out = engine
                            .build(black_box(data), &BuildTreeOptions::default())
                            .unwrap_or_else(|e| panic!("{e}"));
                        black_box(out.nodes.len());
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
