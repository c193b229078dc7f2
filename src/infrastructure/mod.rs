// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// - 缓存（cache）：基于LRU的页面缓存
/// - 仓库实现（repositories）：内存页面仓库
pub mod cache;
pub mod repositories;
