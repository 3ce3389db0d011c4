// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::any::TypeId;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strata_data::ecs::components::{Fog, Transform};
use strata_data::registry::{CapabilityRegistry, Channel};

fn bench_lookups(c: &mut Criterion) {
    let registry = CapabilityRegistry::with_builtins().expect("built-in types conflict");
    registry.freeze();

    let mut group = c.benchmark_group("Registry Lookups");

    group.bench_function("find by key", |b| {
        b.iter(|| black_box(registry.find(black_box(Fog::KEY))).is_some());
    });

    group.bench_function("find by TypeId", |b| {
        let type_id = TypeId::of::<Transform>();
        b.iter(|| black_box(registry.find_by_type_id(black_box(type_id))).is_some());
    });

    group.bench_function("all with capability (Serialization)", |b| {
        b.iter(|| {
            registry
                .all_with_capability(black_box(Channel::Serialization))
                .count()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_lookups);
criterion_main!(benches);
