// 純計算的核心服務：不做 I/O，全部是同步函式

pub mod balancer;
pub mod morph;
pub mod path_parser;
pub mod sequencer;
pub mod stroke;
pub mod svg;
