pub mod circuit_board;
