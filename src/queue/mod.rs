// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供FIFO待抓取队列和线程安全的已访问集合，
/// 二者各自持有独立的锁
pub mod visited_set;
pub mod work_queue;

pub use visited_set::VisitedSet;
pub use work_queue::WorkQueue;
